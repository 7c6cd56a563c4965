//! C2: the 25 hand-crafted per-side heuristic features (§4.2) that feed
//! the contact/crashed input encodings' cross-wired block (§4.3).

mod entry;
mod hits;

use crate::escape::{escapes, escapes1};
use crate::{BAR, HOME_POINTS, MAX_CHEQUERS, N_LOCATIONS};

pub const N_FEATURES: usize = 25;

/// decay coefficients for `backbone`, indexed by the gap (in points) between
/// two anchors; anchors further apart contribute less structural support.
const BACKBONE_COEFFS: [f32; 23] = [
    1.00, 0.85, 0.72, 0.61, 0.52, 0.44, 0.37, 0.31, 0.26, 0.22, 0.18, 0.15, 0.12, 0.10, 0.08,
    0.06, 0.05, 0.04, 0.03, 0.02, 0.02, 0.01, 0.01,
];

/// the 25 features (§4.2) for `side` given its own board and `opp`'s board,
/// both in side-relative form (own point `i`, bar at 24). `crashed_buckets`
/// selects the men-off bucketing: the caller knows from which encoding
/// (contact vs. crashed) this block is being produced.
pub fn features(side: &[u8; N_LOCATIONS], opp: &[u8; N_LOCATIONS], crashed_buckets: bool) -> [f32; N_FEATURES] {
    let mut f = [0f32; N_FEATURES];

    let total: u32 = side.iter().map(|&c| c as u32).sum();
    let off = MAX_CHEQUERS as u32 - total;
    let bucket_width = if crashed_buckets { 5 } else { 3 };
    let off_buckets = bucket(off, bucket_width);
    f[0] = off_buckets[0];
    f[1] = off_buckets[1];
    f[2] = off_buckets[2];

    let own_back = back_index(side);
    let opp_back = back_index(opp);

    f[3] = break_contact(side, opp_back);
    f[4] = own_back.map(|i| i as f32 / 24.0).unwrap_or(0.0);
    f[5] = back_anchor(side).map(|i| i as f32 / 24.0).unwrap_or(0.0);
    f[6] = forward_anchor(side, back_anchor(side));

    let (piploss, p1, p2) = hits::hit_stats(side, opp);
    f[7] = piploss;
    f[8] = p1;
    f[9] = p2;

    let opp_back_dist = 23usize.saturating_sub(opp_back.unwrap_or(0));
    f[10] = escapes(side, opp_back_dist) as f32 / 36.0;
    f[11] = escapes1(side, opp_back_dist) as f32 / 36.0;

    let acontain = containment(opp, false);
    let contain = containment(opp, true);
    f[12] = acontain;
    f[13] = acontain * acontain;
    f[14] = contain;
    f[15] = contain * contain;

    f[16] = mobility(side, opp);
    f[17] = moment2(side, total);

    let mut opp_home = [0u8; HOME_POINTS];
    opp_home.copy_from_slice(&opp[0..HOME_POINTS]);
    let (enter, enter2) = entry::entry_stats(&opp_home, side[BAR]);
    f[18] = enter;
    f[19] = enter2;

    f[20] = timing(side);
    f[21] = backbone(side);

    let (backg, backg1) = back_game_indices(side);
    f[22] = backg;
    f[23] = backg1;

    f[24] = freepip(side, opp_back);

    f
}

/// buckets of width `w` covering `[0, 3w)`, each saturating at 1.0 when full.
fn bucket(value: u32, w: u32) -> [f32; 3] {
    let mut out = [0f32; 3];
    for (k, slot) in out.iter_mut().enumerate() {
        let offset = k as u32 * w;
        let filled = value.saturating_sub(offset).min(w);
        *slot = filled as f32 / w as f32;
    }
    out
}

fn back_index(points: &[u8; N_LOCATIONS]) -> Option<usize> {
    (0..N_LOCATIONS).rev().find(|&i| points[i] > 0)
}

fn back_anchor(points: &[u8; N_LOCATIONS]) -> Option<usize> {
    (0..24).rev().find(|&i| points[i] >= 2)
}

fn forward_anchor(points: &[u8; N_LOCATIONS], back_anchor: Option<usize>) -> f32 {
    let hi = back_anchor.unwrap_or(23).min(18);
    for j in (hi..=18).rev() {
        if points[j] >= 2 {
            return j as f32 / 6.0;
        }
    }
    for j in (12..=17).rev() {
        if points[j] >= 2 {
            return j as f32 / 6.0;
        }
    }
    2.0
}

fn break_contact(side: &[u8; N_LOCATIONS], opp_back: Option<usize>) -> f32 {
    let opp_back = opp_back.unwrap_or(0) as i32;
    let mut sum = 0f32;
    for (i, &count) in side.iter().enumerate().take(24) {
        if count > 0 && i as i32 > opp_back {
            sum += (i as i32 + 1 - opp_back) as f32 * count as f32;
        }
    }
    sum / 167.0
}

/// how well `points` (the opponent's board, from the containing side's
/// viewpoint) boxes in a checker trying to escape from deep home points.
fn containment(points: &[u8; N_LOCATIONS], beyond_closest: bool) -> f32 {
    let min_escapes = (18..24)
        .map(|i| {
            if beyond_closest {
                escapes1(points, i)
            } else {
                escapes(points, i)
            }
        })
        .min()
        .unwrap_or(36);
    (36 - min_escapes) as f32 / 36.0
}

fn mobility(side: &[u8; N_LOCATIONS], opp: &[u8; N_LOCATIONS]) -> f32 {
    let mut sum = 0f32;
    for i in 6..24 {
        if side[i] == 0 {
            continue;
        }
        sum += (i as i32 - 5) as f32 * side[i] as f32 * escapes(opp, i) as f32;
    }
    sum / 3600.0
}

fn moment2(points: &[u8; N_LOCATIONS], total: u32) -> f32 {
    if total == 0 {
        return 0.0;
    }
    let sum: f32 = (0..N_LOCATIONS).map(|i| i as f32 * points[i] as f32).sum();
    let mean = (sum / total as f32).round();
    let variance: f32 = (0..N_LOCATIONS)
        .map(|i| {
            let d = i as f32 - mean;
            d * d * points[i] as f32
        })
        .sum();
    variance / (total as f32 * 400.0)
}

/// a rough timing measure: pip count carried by checkers outside the home
/// board, discounted by gaps already open inside it (open inner points
/// waste future rolls, so they count against timing).
fn timing(points: &[u8; N_LOCATIONS]) -> f32 {
    let outside_pips: u32 = (HOME_POINTS..N_LOCATIONS)
        .map(|i| (i as u32 + 1) * points[i] as u32)
        .sum();
    let gaps: u32 = (0..HOME_POINTS)
        .filter(|&i| points[i] == 0)
        .map(|i| (HOME_POINTS - i) as u32)
        .sum();
    (outside_pips as f32 - gaps as f32) / 100.0
}

fn backbone(points: &[u8; N_LOCATIONS]) -> f32 {
    let anchors: Vec<usize> = (0..24).filter(|&i| points[i] >= 2).collect();
    let mut score = 0f32;
    for pair in anchors.windows(2) {
        let gap = pair[1] - pair[0] - 1;
        if gap < BACKBONE_COEFFS.len() {
            score += BACKBONE_COEFFS[gap];
        }
    }
    score.clamp(0.0, 1.0)
}

/// (backg, backg1): a back-game signature, scored off how many checkers
/// `points` holds deep in the opponent's home board (own indices 18..23).
fn back_game_indices(points: &[u8; N_LOCATIONS]) -> (f32, f32) {
    let deep = &points[18..24];
    let anchors = deep.iter().filter(|&&c| c >= 2).count();
    let total_in_home: u32 = deep.iter().map(|&c| c as u32).sum();

    let mut backg = 0f32;
    let mut backg1 = 0f32;
    if anchors >= 2 {
        backg = (total_in_home as f32 - 3.0) / 4.0;
    } else if anchors == 1 {
        backg1 = total_in_home as f32 / 8.0;
    }
    (backg, backg1)
}

fn freepip(points: &[u8; N_LOCATIONS], opp_back: Option<usize>) -> f32 {
    let opp_back = opp_back.unwrap_or(0);
    let sum: u32 = (0..opp_back.min(24))
        .map(|i| (i as u32 + 1) * points[i] as u32)
        .sum();
    sum as f32 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn starting_position_features_are_finite() {
        let board = Board::standard_starting();
        let f0 = features(board.side(0), board.side(1), false);
        let f1 = features(board.side(1), board.side(0), false);
        assert!(f0.iter().all(|v| v.is_finite()));
        assert!(f1.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn empty_side_has_no_features_blow_up() {
        let side = [0u8; N_LOCATIONS];
        let opp = side;
        let f = features(&side, &opp, false);
        assert!(f.iter().all(|v| v.is_finite()));
        let f = features(&side, &opp, true);
        assert!(f.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn off_buckets_saturate() {
        let buckets = bucket(10, 3);
        assert_eq!(buckets, [1.0, 1.0, 1.0]);
        let buckets = bucket(4, 3);
        assert_eq!(buckets, [1.0, 1.0 / 3.0, 0.0]);
    }
}
