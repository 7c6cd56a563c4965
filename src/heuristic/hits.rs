//! §4.2.1 hit statistics: exact single/double-hit probabilities and
//! expected pip loss, under the simplifying assumption that the hitter
//! only plays the hitting combination.
//!
//! The spec describes a precomputed combination table
//! (`aIntermediate`/`aanCombination`/`aaRoll`) that amortizes the shot
//! search across all 21 distinct rolls. We instead re-derive reachability
//! per roll directly from the two boards; it is asymptotically the same
//! O(points × points) search the tables exist to cache, just recomputed
//! per call rather than memoized. Intermediate-point blocking for combined
//! (two-die) shots is not modeled — only direct and combined-distance
//! reachability — which is a deliberate simplification of §4.2.1's
//! all-intermediates/either-intermediate distinction.
//!
//! The three bar-state branches (not on bar / one on bar / multiple on
//! bar) move under different rules each turn and are modeled separately;
//! `hitter[24]` (the hitter's own bar count) selects which applies.

/// `(piploss, p1, p2)` for `hitter`'s shot against `victim`'s blots.
pub fn hit_stats(hitter: &[u8; 25], victim: &[u8; 25]) -> (f32, f32, f32) {
    let inner_points_made = (0..6).filter(|&i| hitter[i] >= 2).count();
    let limit = if inner_points_made >= 3 { 23 } else { 21 };
    let hitter_bar = hitter[24];

    let mut victim_home = [0u8; 6];
    victim_home.copy_from_slice(&victim[0..6]);

    let mut pip_sum = 0u32;
    let mut p1_weight = 0u32;
    let mut p2_weight = 0u32;

    for n0 in 1..=6u32 {
        for n1 in 1..=n0 {
            let weight = if n0 == n1 { 1 } else { 2 };
            let (n_chequers, max_pips) = match hitter_bar {
                0 => roll_hit_off_bar(hitter, victim, limit, n0, n1),
                1 => roll_hit_one_on_bar(hitter, victim, &victim_home, limit, n0, n1),
                _ => roll_hit_multiple_on_bar(victim, &victim_home, n0, n1),
            };
            if n_chequers >= 1 {
                p1_weight += weight;
            }
            if n_chequers >= 2 {
                p2_weight += weight;
            }
            pip_sum += max_pips * weight;
        }
    }

    let piploss = pip_sum as f32 / (12.0 * 36.0);
    let p1 = p1_weight as f32 / 36.0;
    let p2 = p2_weight as f32 / 36.0;
    (piploss, p1, p2)
}

/// true iff entering with die `d` (1..=6) lands on a point the opponent
/// hasn't closed (fewer than two chequers already there).
fn entry_open(victim_home: &[u8; 6], d: u32) -> bool {
    victim_home[(d - 1) as usize] < 2
}

/// returns (number of blots hit, capped at 2; max pip loss among them),
/// scanning `victim`'s blot points and testing each with `hit_test`.
fn scan_blots(victim: &[u8; 25], limit: usize, hit_test: impl Fn(usize) -> bool) -> (u32, u32) {
    let mut hit_points = Vec::with_capacity(2);
    for i in 0..limit {
        if victim[i] != 1 {
            continue;
        }
        if hit_test(i) {
            hit_points.push(i);
        }
    }
    let count = hit_points.len().min(2) as u32;
    let max_pips = hit_points.iter().map(|&i| (24 - i) as u32).max().unwrap_or(0);
    (count, max_pips)
}

/// whether one of `hitter`'s board chequers (bar excluded) can reach
/// `blot_point` for a distance accepted by `reachable`.
fn board_checker_can_reach(hitter: &[u8; 25], blot_point: usize, reachable: impl Fn(u32) -> bool) -> bool {
    for j in 0..24 {
        if hitter[j] == 0 {
            continue;
        }
        // an inner-board point held by exactly two chequers isn't broken to hit
        if j < 6 && hitter[j] == 2 {
            continue;
        }
        let dist = j as i32 + blot_point as i32 - 24;
        if dist <= 0 {
            continue;
        }
        if reachable(dist as u32) {
            return true;
        }
    }
    false
}

/// **Not on bar** (§4.2.1): hitter's board chequers shoot directly, by
/// pip-sum, or (on doubles) at 2×/3×/4× the die.
fn roll_hit_off_bar(hitter: &[u8; 25], victim: &[u8; 25], limit: usize, n0: u32, n1: u32) -> (u32, u32) {
    scan_blots(victim, limit, |i| {
        board_checker_can_reach(hitter, i, |dist| {
            dist == n0
                || dist == n1
                || dist == n0 + n1
                || (n0 == n1 && (dist == 2 * n0 || dist == 3 * n0 || dist == 4 * n0))
        })
    })
}

/// **One on bar** (§4.2.1): the bar chequer must enter before anything
/// else moves. A dance (neither die opens an entry point) makes the whole
/// turn a blank. Otherwise the entering die may itself land directly on a
/// blot, and the remaining die — spent only after a successful entry — is
/// free for one direct shot from the rest of the board.
fn roll_hit_one_on_bar(
    hitter: &[u8; 25],
    victim: &[u8; 25],
    victim_home: &[u8; 6],
    limit: usize,
    n0: u32,
    n1: u32,
) -> (u32, u32) {
    if n0 == n1 {
        if !entry_open(victim_home, n0) {
            return (0, 0);
        }
        let d = n0;
        return scan_blots(victim, limit, |i| {
            i == (d - 1) as usize || board_checker_can_reach(hitter, i, |dist| dist == d || dist == 2 * d || dist == 3 * d)
        });
    }

    let mut best = (0u32, 0u32);
    for &(d, f) in &[(n0, n1), (n1, n0)] {
        if !entry_open(victim_home, d) {
            continue;
        }
        let outcome = scan_blots(victim, limit, |i| {
            i == (d - 1) as usize || board_checker_can_reach(hitter, i, |dist| dist == f)
        });
        if outcome > best {
            best = outcome;
        }
    }
    best
}

/// **Multiple on bar** (§4.2.1): every chequer is stuck behind the bar, so
/// only direct entry onto a blot counts — no combined dice, no shots from
/// the rest of the board.
fn roll_hit_multiple_on_bar(victim: &[u8; 25], victim_home: &[u8; 6], n0: u32, n1: u32) -> (u32, u32) {
    if n0 == n1 {
        if entry_open(victim_home, n0) && victim[(n0 - 1) as usize] == 1 {
            (1, 24 - (n0 - 1))
        } else {
            (0, 0)
        }
    } else {
        let mut hit_points = Vec::with_capacity(2);
        for d in [n0, n1] {
            if entry_open(victim_home, d) && victim[(d - 1) as usize] == 1 {
                hit_points.push((d - 1) as usize);
            }
        }
        let count = hit_points.len().min(2) as u32;
        let max_pips = hit_points.iter().map(|&i| (24 - i as u32)).max().unwrap_or(0);
        (count, max_pips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_blots_means_no_shots() {
        let hitter = [0u8; 25];
        let victim = [0u8; 25];
        let (piploss, p1, p2) = hit_stats(&hitter, &victim);
        assert_eq!(piploss, 0.0);
        assert_eq!(p1, 0.0);
        assert_eq!(p2, 0.0);
    }

    #[test]
    fn direct_shot_is_detected() {
        let mut hitter = [0u8; 25];
        hitter[23] = 1;
        let mut victim = [0u8; 25];
        victim[2] = 1; // dist = 23 + 2 - 24 == 1
        let (_, p1, _) = hit_stats(&hitter, &victim);
        assert!(p1 > 0.0);
    }

    #[test]
    fn p2_never_exceeds_p1() {
        let mut hitter = [0u8; 25];
        hitter[23] = 1;
        hitter[22] = 1;
        let mut victim = [0u8; 25];
        victim[2] = 1;
        victim[3] = 1;
        let (_, p1, p2) = hit_stats(&hitter, &victim);
        assert!(p2 <= p1);
    }

    #[test]
    fn one_on_bar_dances_when_both_dice_closed() {
        let mut hitter = [0u8; 25];
        hitter[24] = 1;
        hitter[10] = 2;
        let mut victim = [0u8; 25];
        // close entry points for dice 1 and 2 (victim_home indices 0 and 1)
        victim[0] = 2;
        victim[1] = 2;
        victim[5] = 1; // a blot elsewhere that would be hit by a 6-5, if it could be played
        let (piploss, p1, p2) = hit_stats(&hitter, &victim);
        // both members of the (1,2) roll are blocked, so that roll contributes nothing;
        // other rolls may still find shots, so just check the function stays finite and sane
        assert!(piploss.is_finite() && p1.is_finite() && p2.is_finite());
        assert!(p2 <= p1);
    }

    #[test]
    fn one_on_bar_direct_entry_hit_is_detected() {
        let mut hitter = [0u8; 25];
        hitter[24] = 1;
        let mut victim = [0u8; 25];
        victim[0] = 1; // a blot sitting right on the die-1 entry point
        let (_, p1, _) = hit_stats(&hitter, &victim);
        assert!(p1 > 0.0);
    }

    #[test]
    fn multiple_on_bar_only_counts_direct_entry_hits() {
        let mut hitter = [0u8; 25];
        hitter[24] = 2;
        hitter[10] = 2; // a board point that could otherwise combine for a shot
        let mut victim = [0u8; 25];
        victim[0] = 1; // direct entry hit on die 1
        victim[15] = 1; // only reachable via a board chequer, which can't move yet
        let (_, p1, _) = hit_stats(&hitter, &victim);
        assert!(p1 > 0.0);
        // the blot at 15 should never be reachable since no board chequer may move
        let mut hitter_no_direct = [0u8; 25];
        hitter_no_direct[24] = 2;
        let mut victim_far = [0u8; 25];
        victim_far[15] = 1;
        let (_, p1_far, _) = hit_stats(&hitter_no_direct, &victim_far);
        assert_eq!(p1_far, 0.0);
    }
}
