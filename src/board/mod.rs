mod class;

pub use class::PositionClass;

use crate::error::{EvalError, Result};
use crate::{Arbitrary, BAR, MAX_CHEQUERS, N_LOCATIONS, N_SIDES};

/// A backgammon position: two sides, each a side-relative grid of 25
/// non-negative checker counts (§3). `points[s][i]` is side `s`'s count at
/// its own `i`-th point for `i in 0..24`, and its bar count at `i == 24`.
///
/// Because both sides index home-to-opponent in the same direction,
/// evaluation code written for "this side" is reused for the other side
/// by swapping which half of `points` is passed as `self`/`opp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    points: [[u8; N_LOCATIONS]; N_SIDES],
}

impl Board {
    pub fn empty() -> Self {
        Self {
            points: [[0; N_LOCATIONS]; N_SIDES],
        }
    }

    pub fn new(side0: [u8; N_LOCATIONS], side1: [u8; N_LOCATIONS]) -> Self {
        Self {
            points: [side0, side1],
        }
    }

    pub fn standard_starting() -> Self {
        // S1: point5=5, point7=3, point12=5, point23=2 (1-indexed), per side
        let mut side = [0u8; N_LOCATIONS];
        side[4] = 5;
        side[6] = 3;
        side[11] = 5;
        side[22] = 2;
        Self::new(side, side)
    }

    #[inline]
    pub fn checkers(&self, side: usize, point: usize) -> u8 {
        self.points[side][point]
    }

    #[inline]
    pub fn side(&self, side: usize) -> &[u8; N_LOCATIONS] {
        &self.points[side]
    }

    #[inline]
    pub fn bar(&self, side: usize) -> u8 {
        self.points[side][BAR]
    }

    /// total checkers on the board or bar for `side` (does not include borne off)
    pub fn total(&self, side: usize) -> u8 {
        self.points[side].iter().sum()
    }

    pub fn off(&self, side: usize) -> u8 {
        MAX_CHEQUERS - self.total(side)
    }

    /// highest occupied index (own point numbering, bar = 24); `None` if empty
    pub fn back(&self, side: usize) -> Option<usize> {
        (0..N_LOCATIONS).rev().find(|&i| self.points[side][i] > 0)
    }

    /// true iff the position satisfies the data-model invariants (§3)
    pub fn validate(&self) -> Result<()> {
        for side in 0..N_SIDES {
            let total = self.total(side);
            if total > MAX_CHEQUERS {
                return Err(EvalError::InputShape(format!(
                    "side {side} has {total} chequers, exceeds {MAX_CHEQUERS}"
                )));
            }
        }
        Ok(())
    }

    /// whether the side's back checker (if any) has crossed past the
    /// opponent's, i.e. the game is still in contact (§3 invariant, §4.4.2)
    pub fn is_contact(&self) -> bool {
        let back0 = self.back(0).unwrap_or(0);
        let back1 = self.back(1).unwrap_or(0);
        back0 + back1 > 22
    }

    pub fn classify(&self) -> PositionClass {
        class::classify(self)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Arbitrary for Board {
    fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::rng();
        let mut points = [[0u8; N_LOCATIONS]; N_SIDES];
        for side in 0..N_SIDES {
            let mut remaining = MAX_CHEQUERS;
            while remaining > 0 {
                let slot = rng.random_range(0..N_LOCATIONS);
                let add = rng.random_range(0..=remaining.min(5));
                points[side][slot] = points[side][slot].saturating_add(add);
                remaining -= add;
                if add == 0 && rng.random_bool(0.1) {
                    break;
                }
            }
        }
        Self { points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_contact() {
        let board = Board::standard_starting();
        assert!(board.is_contact());
        assert_eq!(board.total(0), MAX_CHEQUERS);
        assert_eq!(board.total(1), MAX_CHEQUERS);
    }

    #[test]
    fn empty_board_has_no_back_checker() {
        let board = Board::empty();
        assert_eq!(board.back(0), None);
    }

    #[test]
    fn validate_rejects_too_many_chequers() {
        let mut side0 = [0u8; N_LOCATIONS];
        side0[0] = 16;
        let board = Board::new(side0, [0; N_LOCATIONS]);
        assert!(board.validate().is_err());
    }
}
