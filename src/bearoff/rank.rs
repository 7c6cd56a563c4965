//! Combinatorial unranking (§4.7): a bijection between distributions
//! `{c_0,...,c_{p-1} : sum ≤ chequers}` over `p` home points and the
//! integers `0..C(points+chequers, points)`.

fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result = 1u64;
    for i in 0..k {
        result = result * (n - i) / (i + 1);
    }
    result
}

/// number of distinct positions for `points` home points holding at most
/// `chequers` total checkers.
pub fn position_count(points: usize, chequers: usize) -> usize {
    binomial((points + chequers) as u64, points as u64) as usize
}

/// rank of a composition (lexicographic over increasing per-slot counts)
pub fn rank(counts: &[u8], chequers: usize) -> usize {
    let slots = counts.len();
    let mut remaining = chequers;
    let mut total_rank = 0usize;
    for (idx, &c) in counts.iter().enumerate() {
        let remaining_slots = slots - idx - 1;
        for v in 0..c as usize {
            total_rank += binomial((remaining - v + remaining_slots) as u64, remaining_slots as u64) as usize;
        }
        remaining -= c as usize;
    }
    total_rank
}

/// inverse of [`rank`].
pub fn unrank(mut r: usize, points: usize, chequers: usize) -> Vec<u8> {
    let mut counts = vec![0u8; points];
    let mut remaining = chequers;
    for idx in 0..points {
        let remaining_slots = points - idx - 1;
        let mut v = 0usize;
        loop {
            let count_with_v = binomial((remaining - v + remaining_slots) as u64, remaining_slots as u64) as usize;
            if r < count_with_v {
                counts[idx] = v as u8;
                remaining -= v;
                break;
            }
            r -= count_with_v;
            v += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_unrank_is_identity_for_every_composition() {
        let points = 4;
        let chequers = 5;
        let total = position_count(points, chequers);
        let mut seen = vec![false; total];
        for a in 0..=chequers {
            for b in 0..=(chequers - a) {
                for c in 0..=(chequers - a - b) {
                    for d in 0..=(chequers - a - b - c) {
                        let counts = [a as u8, b as u8, c as u8, d as u8];
                        let r = rank(&counts, chequers);
                        assert!(r < total);
                        assert!(!seen[r], "duplicate rank {r}");
                        seen[r] = true;
                        let back = unrank(r, points, chequers);
                        assert_eq!(&back[..], &counts[..]);
                    }
                }
            }
        }
        assert!(seen.iter().all(|&b| b));
    }

    #[test]
    fn position_count_matches_stars_and_bars() {
        assert_eq!(position_count(6, 15), binomial(21, 6) as usize);
    }
}
