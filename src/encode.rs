//! C3: board → input vector, dispatched by position class (§4.3).
//!
//! Every encoder writes into a caller-provided buffer and never allocates;
//! the public functions below return owned arrays only because the crate's
//! callers (façade, tests) find that more convenient — the per-point helper
//! `write_point` below is where the zero-allocation contract actually lives.

use crate::board::Board;
use crate::error::{EvalError, Result};
use crate::heuristic;
use crate::{INPUTS_BASE, INPUTS_CONTACT, INPUTS_PRUNING, INPUTS_RACE, N_LOCATIONS, N_SIDES};

/// four floats per board point, keyed by checker count (clamped to 15)
fn point_row(count: u8) -> [f32; 4] {
    let n = count.min(15) as f32;
    match count {
        0 => [0.0, 0.0, 0.0, 0.0],
        1 => [1.0, 0.0, 0.0, 0.0],
        2 => [0.0, 1.0, 0.0, 0.0],
        _ => [0.0, 0.0, 1.0, (n - 3.0) / 2.0],
    }
}

/// bar row: a cumulative flavor of [`point_row`] (each lower threshold stays
/// lit as higher ones turn on).
fn bar_row(count: u8) -> [f32; 4] {
    let n = count.min(15) as f32;
    match count {
        0 => [0.0, 0.0, 0.0, 0.0],
        1 => [1.0, 0.0, 0.0, 0.0],
        2 => [1.0, 1.0, 0.0, 0.0],
        _ => [1.0, 1.0, 1.0, (n - 3.0) / 2.0],
    }
}

fn write_point(buf: &mut [f32], offset: usize, row: [f32; 4]) {
    buf[offset..offset + 4].copy_from_slice(&row);
}

/// writes the 200-float base encoding (§4.3) into `buf`.
pub fn encode_base_into(board: &Board, buf: &mut [f32]) {
    debug_assert!(buf.len() >= INPUTS_BASE);
    for side in 0..N_SIDES {
        let base = side * 100;
        for point in 0..24 {
            write_point(buf, base + point * 4, point_row(board.checkers(side, point)));
        }
        write_point(buf, base + 96, bar_row(board.bar(side)));
    }
}

pub fn encode_base(board: &Board) -> [f32; INPUTS_BASE] {
    let mut buf = [0f32; INPUTS_BASE];
    encode_base_into(board, &mut buf);
    buf
}

pub fn encode_pruning(board: &Board) -> [f32; INPUTS_PRUNING] {
    encode_base(board)
}

/// contact/crashed shape: base 200 + a 25-float heuristic block per side.
/// The blocks are cross-wired (§9): side 0's block is computed from side
/// 1's board (as the "self" argument) and vice versa. This is intentional
/// and must not be "fixed".
fn encode_with_heuristics(board: &Board, crashed_buckets: bool) -> [f32; INPUTS_CONTACT] {
    let mut buf = [0f32; INPUTS_CONTACT];
    encode_base_into(board, &mut buf[0..INPUTS_BASE]);

    let side0_block = heuristic::features(board.side(1), board.side(0), crashed_buckets);
    let side1_block = heuristic::features(board.side(0), board.side(1), crashed_buckets);
    buf[200..225].copy_from_slice(&side0_block);
    buf[225..250].copy_from_slice(&side1_block);
    buf
}

pub fn encode_contact(board: &Board) -> [f32; INPUTS_CONTACT] {
    encode_with_heuristics(board, false)
}

pub fn encode_crashed(board: &Board) -> [f32; INPUTS_CONTACT] {
    encode_with_heuristics(board, true)
}

/// the 214-float race encoding (§4.3): per side, 23 points × (one-hot(1),
/// one-hot(2), one-hot(≥3), overflow) + 14 men-off one-hots + a crossovers
/// scalar.
pub fn encode_race(board: &Board) -> Result<[f32; INPUTS_RACE]> {
    let mut buf = [0f32; INPUTS_RACE];
    for side in 0..N_SIDES {
        let base = side * 107;
        for point in 0..23 {
            let count = board.checkers(side, point);
            let offset = base + point * 4;
            buf[offset] = (count == 1) as u8 as f32;
            buf[offset + 1] = (count == 2) as u8 as f32;
            buf[offset + 2] = (count >= 3) as u8 as f32;
            buf[offset + 3] = if count > 3 { (count as f32 - 3.0) / 2.0 } else { 0.0 };
        }

        let off = board.off(side);
        if off >= 1 && off <= 14 {
            buf[base + 92 + (off as usize - 1)] = 1.0;
        } else if off > 14 {
            return Err(EvalError::InputShape(format!(
                "side {side} has {off} chequers off, race encoding only covers 1..14"
            )));
        }

        let mut crossovers = 0f32;
        for k in 1..=3usize {
            for i in (6 * k)..(6 * k + 6).min(N_LOCATIONS) {
                crossovers += k as f32 * board.checkers(side, i) as f32;
            }
        }
        buf[base + 106] = crossovers / 10.0;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_five_row_matches_spec_example() {
        assert_eq!(point_row(5), [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn count_two_row_matches_spec_example() {
        assert_eq!(point_row(2), [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn base_encoding_is_deterministic() {
        let board = Board::standard_starting();
        let a = encode_base(&board);
        let b = encode_base(&board);
        assert_eq!(a, b);
        assert!(a.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn contact_encoding_is_finite() {
        let board = Board::standard_starting();
        let v = encode_contact(&board);
        assert!(v.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn race_encoding_is_finite_for_starting_position() {
        let board = Board::standard_starting();
        let v = encode_race(&board).expect("starting position is within race coverage");
        assert!(v.iter().all(|v| v.is_finite()));
    }
}
