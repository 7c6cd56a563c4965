//! C1: escape tables (§4.1).
//!
//! A checker sitting behind a blockade sees the next up-to-12 points ahead
//! as a 12-bit occupancy mask (bit `i` set iff that point holds ≥2
//! opposing chequers). `anEscapes`/`anEscapes1` count, out of the 36 dice
//! rolls, how many let the checker clear the blockade.

use std::sync::OnceLock;

const WINDOW: usize = 12;
const TABLE_SIZE: usize = 1 << WINDOW;

struct EscapeTables {
    any_target: [u32; TABLE_SIZE],
    beyond_closest: [u32; TABLE_SIZE],
}

static TABLES: OnceLock<EscapeTables> = OnceLock::new();

fn tables() -> &'static EscapeTables {
    TABLES.get_or_init(build)
}

fn mask_bit(mask: u32, i: usize) -> bool {
    i >= WINDOW || (mask >> i) & 1 == 1
}

/// Can a single roll `(d0, d1)` (1-indexed pips, `d0 <= 6`, `d1 <= 6`) carry the
/// checker clear of `mask`? `restrict_beyond_closest` additionally requires
/// the chosen target to land strictly beyond the nearest blocked point.
fn escapable(mask: u32, d0: u32, d1: u32, restrict_beyond_closest: bool) -> bool {
    let closest_blocked = (0..WINDOW as u32).find(|&i| mask_bit(mask, i as usize));
    let clears = |target_pips: u32| -> bool {
        let beyond_window = target_pips as usize >= WINDOW;
        let open = beyond_window || !mask_bit(mask, target_pips as usize - 1);
        if !open {
            return false;
        }
        if !restrict_beyond_closest {
            return true;
        }
        match closest_blocked {
            None => true,
            Some(closest) => beyond_window || target_pips - 1 > closest,
        }
    };

    if d0 == d1 {
        // doubles: four dice of the same value, chained one after another
        let mut distance = 0u32;
        for _ in 0..4 {
            let next = distance + d0;
            if clears(next) {
                return true;
            }
            if next as usize >= WINDOW || mask_bit(mask, next as usize - 1) {
                break;
            }
            distance = next;
        }
        return false;
    }

    if clears(d0) || clears(d1) {
        return true;
    }
    let combined = d0 + d1;
    let step_via_d0_open = !mask_bit(mask, d0 as usize - 1);
    let step_via_d1_open = !mask_bit(mask, d1 as usize - 1);
    if (step_via_d0_open || step_via_d1_open) && clears(combined) {
        return true;
    }
    false
}

fn build() -> EscapeTables {
    let mut any_target = [0u32; TABLE_SIZE];
    let mut beyond_closest = [0u32; TABLE_SIZE];
    for mask in 0..TABLE_SIZE as u32 {
        let mut total = 0u32;
        let mut total1 = 0u32;
        for n0 in 0..6u32 {
            for n1 in 0..=n0 {
                let weight = if n0 == n1 { 1 } else { 2 };
                if escapable(mask, n0 + 1, n1 + 1, false) {
                    total += weight;
                }
                if escapable(mask, n0 + 1, n1 + 1, true) {
                    total1 += weight;
                }
            }
        }
        any_target[mask as usize] = total;
        beyond_closest[mask as usize] = total1;
    }
    EscapeTables {
        any_target,
        beyond_closest,
    }
}

/// builds the 12-bit occupancy mask for a checker `n` pips from clearing
/// `points` (a single side's own 25-count array), per §4.1's public contract.
fn occupancy_mask(points: &[u8; 25], n: usize) -> u32 {
    let mut mask = 0u32;
    for i in 0..n.min(WINDOW) {
        let idx = 24 + i - n;
        if points[idx] >= 2 {
            mask |= 1 << i;
        }
    }
    mask
}

/// out of the 36 dice rolls, how many let a checker `n` pips out clear `points`.
pub fn escapes(points: &[u8; 25], n: usize) -> u32 {
    tables().any_target[occupancy_mask(points, n) as usize]
}

/// as [`escapes`], but the escaping target must land strictly beyond the
/// nearest blocked point rather than merely on any open point.
pub fn escapes1(points: &[u8; 25], n: usize) -> u32 {
    tables().beyond_closest[occupancy_mask(points, n) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_occupancy_escapes_all_rolls() {
        let empty = [0u8; 25];
        assert_eq!(escapes(&empty, 6), 36);
        assert_eq!(escapes1(&empty, 6), 36);
    }

    #[test]
    fn blocking_a_point_strictly_decreases_escapes() {
        let empty = [0u8; 25];
        let mut blocked = [0u8; 25];
        blocked[18] = 2; // 24 + 0 - 6 == 18, blocks bit 0 for n == 6
        assert!(escapes(&blocked, 6) < escapes(&empty, 6));
    }

    #[test]
    fn all_table_entries_are_in_range() {
        let t = tables();
        assert!(t.any_target.iter().all(|&v| v <= 36));
        assert!(t.beyond_closest.iter().all(|&v| v <= 36));
    }

    #[test]
    fn zero_distance_trivially_escapes() {
        let board = [0u8; 25];
        assert_eq!(escapes(&board, 0), 36);
    }
}
