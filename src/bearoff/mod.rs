//! C7: memory-mapped one-sided and two-sided bearoff endgame databases
//! (§4.7). Files begin with a small fixed header, then an array of entries
//! indexed by [`rank::rank`].
//!
//! The wire layout here is this engine's own (byteorder little-endian,
//! `memmap2`-backed); no external bearoff file format is assumed since none
//! was available to ground against. What's load-bearing is the public
//! contract: `evaluate(side_home, opp_home) -> [f32; 5]`, out-of-range
//! positions reported as `BearoffOutOfRange`, and pages faulted in lazily
//! by the OS rather than read eagerly.

mod rank;

use crate::error::{EvalError, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;

const DIST_SLOTS: usize = 32;
const HEADER_LEN: usize = 16; // points:u32, chequers:u32, compressed:u8 (+ padding), reserved

/// one side's home-board distribution over "rolls to bear all checkers off",
/// plus the same distribution restricted to games where the side still
/// owes a gammon.
#[derive(Debug, Clone, Copy)]
struct Distribution {
    plain: [f32; DIST_SLOTS],
    gammon: [f32; DIST_SLOTS],
}

/// a one-sided bearoff database: per home-board position, a kinematic
/// distribution over rolls-to-bear-off, used to convolve two independent
/// sides into a win/gammon probability.
pub struct OneSidedDb {
    mmap: Mmap,
    points: usize,
    chequers: usize,
    compressed: bool,
}

impl OneSidedDb {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_mmap(mmap)
    }

    fn from_mmap(mmap: Mmap) -> Result<Self> {
        let mut header = Cursor::new(&mmap[0..HEADER_LEN]);
        let points = header.read_u32::<LittleEndian>()? as usize;
        let chequers = header.read_u32::<LittleEndian>()? as usize;
        let compressed = header.read_u8()? != 0;
        if points == 0 || chequers == 0 {
            return Err(EvalError::WeightFormatError("bearoff header has zero dimension".into()));
        }
        Ok(Self {
            mmap,
            points,
            chequers,
            compressed,
        })
    }

    fn distribution(&self, r: usize) -> Result<Distribution> {
        if self.compressed {
            self.distribution_compressed(r)
        } else {
            self.distribution_uncompressed(r)
        }
    }

    fn distribution_uncompressed(&self, r: usize) -> Result<Distribution> {
        let record_len = DIST_SLOTS * 2 * 2; // plain + gammon, u16 each
        let start = HEADER_LEN + r * record_len;
        let end = start + record_len;
        let bytes = self
            .mmap
            .get(start..end)
            .ok_or_else(|| EvalError::BearoffOutOfRange(format!("rank {r} outside mapped file")))?;
        let mut cur = Cursor::new(bytes);
        let mut plain = [0f32; DIST_SLOTS];
        for slot in plain.iter_mut() {
            *slot = cur.read_u16::<LittleEndian>()? as f32 / 65535.0;
        }
        let mut gammon = [0f32; DIST_SLOTS];
        for slot in gammon.iter_mut() {
            *slot = cur.read_u16::<LittleEndian>()? as f32 / 65535.0;
        }
        Ok(Distribution { plain, gammon })
    }

    /// compressed records are `u16 min, u16 max` followed by `max-min+1`
    /// u16 values for the plain subdistribution, then the same for gammon;
    /// located via an offset table of `position_count+1` u64s immediately
    /// after the header.
    fn distribution_compressed(&self, r: usize) -> Result<Distribution> {
        let count = rank::position_count(self.points, self.chequers);
        let table_start = HEADER_LEN;
        let entry_off = table_start + r * 8;
        let next_off = table_start + (r + 1) * 8;
        let oob = || EvalError::BearoffOutOfRange(format!("rank {r} outside offset table"));
        let entry_bytes = self.mmap.get(entry_off..entry_off + 8).ok_or_else(oob)?;
        let next_bytes = self.mmap.get(next_off..next_off + 8).ok_or_else(oob)?;
        let start = Cursor::new(entry_bytes).read_u64::<LittleEndian>()? as usize;
        let end = Cursor::new(next_bytes).read_u64::<LittleEndian>()? as usize;
        let data_base = table_start + (count + 1) * 8;
        let bytes = self
            .mmap
            .get(data_base + start..data_base + end)
            .ok_or_else(|| EvalError::BearoffOutOfRange(format!("rank {r} record out of bounds")))?;

        let mut plain = [0f32; DIST_SLOTS];
        let mut gammon = [0f32; DIST_SLOTS];
        let mut cur = Cursor::new(bytes);
        for target in [&mut plain, &mut gammon] {
            let min = cur.read_u16::<LittleEndian>()? as usize;
            let max = cur.read_u16::<LittleEndian>()? as usize;
            // the record holds exactly `max-min+1` values regardless of
            // DIST_SLOTS; every one must be read to keep the cursor aligned
            // for the next sub-distribution, even though only in-range
            // slots get written.
            for i in min..=max {
                let value = cur.read_u16::<LittleEndian>()? as f32 / 65535.0;
                if i < DIST_SLOTS {
                    target[i] = value;
                }
            }
        }
        Ok(Distribution { plain, gammon })
    }

    /// `evaluate(side_home, opp_home) -> [winProb, winGammon, 0, loseGammon, 0]`;
    /// the side on roll is `side_home`.
    pub fn evaluate(&self, side_home: &[u8], opp_home: &[u8]) -> Result<[f32; 5]> {
        self.check_coverage(side_home)?;
        self.check_coverage(opp_home)?;

        let self_dist = self.distribution(rank::rank(side_home, self.chequers))?;
        let opp_dist = self.distribution(rank::rank(opp_home, self.chequers))?;

        let win_prob = convolve_win(&self_dist.plain, &opp_dist.plain);
        let win_gammon = convolve_win(&self_dist.gammon, &opp_dist.plain);
        let lose_gammon = convolve_win(&opp_dist.gammon, &self_dist.plain);

        Ok([win_prob, win_gammon, 0.0, lose_gammon, 0.0])
    }

    fn check_coverage(&self, home: &[u8]) -> Result<()> {
        if home.len() != self.points {
            return Err(EvalError::BearoffOutOfRange(format!(
                "expected {} home points, got {}",
                self.points,
                home.len()
            )));
        }
        let total: u32 = home.iter().map(|&c| c as u32).sum();
        if total as usize > self.chequers {
            return Err(EvalError::BearoffOutOfRange(format!(
                "{total} chequers exceeds database capacity {}",
                self.chequers
            )));
        }
        Ok(())
    }
}

/// P(the `self` side, on roll, finishes at or before the opponent),
/// given each side's independent distribution over rolls-to-finish.
fn convolve_win(self_dist: &[f32; DIST_SLOTS], opp_dist: &[f32; DIST_SLOTS]) -> f32 {
    let mut opp_cdf = 0f32;
    let mut win = 0f32;
    for i in 0..DIST_SLOTS {
        win += self_dist[i] * (1.0 - opp_cdf);
        opp_cdf += opp_dist[i];
    }
    win.clamp(0.0, 1.0)
}

/// a two-sided bearoff database: direct terminal equity per position pair,
/// skipping kinematic convolution entirely.
pub struct TwoSidedDb {
    mmap: Mmap,
    points: usize,
    chequers: usize,
    cubeful: bool,
}

impl TwoSidedDb {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_mmap(mmap)
    }

    fn from_mmap(mmap: Mmap) -> Result<Self> {
        let mut header = Cursor::new(&mmap[0..HEADER_LEN]);
        let points = header.read_u32::<LittleEndian>()? as usize;
        let chequers = header.read_u32::<LittleEndian>()? as usize;
        let cubeful = header.read_u8()? != 0;
        if points == 0 || chequers == 0 {
            return Err(EvalError::WeightFormatError("bearoff header has zero dimension".into()));
        }
        Ok(Self {
            mmap,
            points,
            chequers,
            cubeful,
        })
    }

    pub fn evaluate(&self, side_home: &[u8], opp_home: &[u8]) -> Result<[f32; 5]> {
        if side_home.len() != self.points || opp_home.len() != self.points {
            return Err(EvalError::BearoffOutOfRange("home slice length mismatch".into()));
        }
        let self_total: u32 = side_home.iter().map(|&c| c as u32).sum();
        let opp_total: u32 = opp_home.iter().map(|&c| c as u32).sum();
        if self_total as usize > self.chequers || opp_total as usize > self.chequers {
            return Err(EvalError::BearoffOutOfRange("chequer count exceeds database capacity".into()));
        }

        let n_positions = rank::position_count(self.points, self.chequers);
        let r_self = rank::rank(side_home, self.chequers);
        let r_opp = rank::rank(opp_home, self.chequers);
        let combined = r_self * n_positions + r_opp;

        let record_len = if self.cubeful { 8 } else { 4 };
        let start = HEADER_LEN + combined * record_len;
        let end = start + 4;
        let bytes = self
            .mmap
            .get(start..end)
            .ok_or_else(|| EvalError::BearoffOutOfRange(format!("position pair {combined} outside mapped file")))?;
        let equity = Cursor::new(bytes).read_f32::<LittleEndian>()?;

        let mut out = [0f32; 5];
        out[0] = equity;
        Ok(out)
    }
}
