//! C8: the evaluator façade — classify → encode → NN-or-bearoff →
//! canonicalize (§4.8).

use crate::bearoff::{OneSidedDb, TwoSidedDb};
use crate::board::{Board, PositionClass};
use crate::config::EngineConfig;
use crate::encode;
use crate::error::{EvalError, Result};
use crate::network::{Network, WeightsBundle};
use crate::HOME_POINTS;
use std::sync::Arc;

/// shared, read-only evaluation context; cheap to `Clone` across worker
/// threads since everything behind it is `Arc`-held (§5).
#[derive(Clone)]
pub struct Evaluator {
    weights: Option<Arc<WeightsBundle>>,
    bearoff_one_sided: Option<Arc<OneSidedDb>>,
    bearoff_two_sided: Option<Arc<TwoSidedDb>>,
    /// whether [`Evaluator::evaluate`] should prefer the cheaper pruning
    /// nets over the full nets, per [`EngineConfig::use_pruning`].
    use_pruning: bool,
}

impl Evaluator {
    pub fn new(
        weights: Option<WeightsBundle>,
        bearoff_one_sided: Option<OneSidedDb>,
        bearoff_two_sided: Option<TwoSidedDb>,
        use_pruning: bool,
    ) -> Self {
        Self {
            weights: weights.map(Arc::new),
            bearoff_one_sided: bearoff_one_sided.map(Arc::new),
            bearoff_two_sided: bearoff_two_sided.map(Arc::new),
            use_pruning,
        }
    }

    /// loads whatever the config names; bearoff paths are optional and
    /// simply leave that lookup path disabled if absent.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let text_or_binary = std::fs::read(&config.weights_path)?;
        let weights = match std::str::from_utf8(&text_or_binary) {
            Ok(text) if text.is_ascii() => WeightsBundle::from_text(text),
            _ => WeightsBundle::from_binary(std::io::Cursor::new(&text_or_binary)),
        }?;
        let one_sided = config
            .bearoff_one_sided_path
            .as_ref()
            .map(OneSidedDb::open)
            .transpose()?;
        let two_sided = config
            .bearoff_two_sided_path
            .as_ref()
            .map(TwoSidedDb::open)
            .transpose()?;
        Ok(Self::new(Some(weights), one_sided, two_sided, config.use_pruning))
    }

    /// application-edge convenience: assume the conventional file names
    /// inside `dir` (`weights.bin`, `onesided.db`, `twosided.db`, the
    /// latter two optional) and load whatever is present. Unlike
    /// [`Evaluator::from_config`], failures here are reported with
    /// `anyhow` context naming which artifact failed, since there's no
    /// caller left to `match` on an `EvalError` variant at this boundary.
    pub fn from_directory(dir: impl AsRef<std::path::Path>, use_pruning: bool) -> anyhow::Result<Self> {
        use anyhow::Context;
        let dir = dir.as_ref();
        let config = EngineConfig {
            weights_path: dir.join("weights.bin"),
            bearoff_one_sided_path: Some(dir.join("onesided.db")).filter(|p| p.exists()),
            bearoff_two_sided_path: Some(dir.join("twosided.db")).filter(|p| p.exists()),
            use_pruning,
        };
        Self::from_config(&config).with_context(|| format!("loading evaluator artifacts from {}", dir.display()))
    }

    pub fn classify(&self, board: &Board) -> PositionClass {
        board.classify()
    }

    /// evaluates with the full nets, or the cheaper pruning nets if
    /// [`EngineConfig::use_pruning`] asked for them at construction time.
    pub fn evaluate(&self, board: &Board) -> Result<[f32; 5]> {
        self.evaluate_inner(board, self.use_pruning)
    }

    /// forces the pruning nets regardless of how this evaluator was configured.
    pub fn evaluate_pruning(&self, board: &Board) -> Result<[f32; 5]> {
        self.evaluate_inner(board, true)
    }

    fn evaluate_inner(&self, board: &Board, pruning: bool) -> Result<[f32; 5]> {
        board.validate()?;

        let raw = match board.classify() {
            PositionClass::Over => self.evaluate_over(board),
            PositionClass::BearoffTS | PositionClass::Bearoff2 => match &self.bearoff_two_sided {
                Some(db) => match self.evaluate_two_sided(db, board) {
                    Ok(out) => out,
                    Err(EvalError::BearoffOutOfRange(reason)) => {
                        log::warn!("two-sided bearoff miss ({reason}), falling back to one-sided/race");
                        self.evaluate_one_sided_or_race(board, pruning)?
                    }
                    Err(e) => return Err(e),
                },
                None => self.evaluate_one_sided_or_race(board, pruning)?,
            },
            PositionClass::Bearoff1 | PositionClass::BearoffOS => self.evaluate_one_sided_or_race(board, pruning)?,
            PositionClass::Race => self.evaluate_race(board, pruning)?,
            PositionClass::Crashed => self.evaluate_net(
                |b| &b.crashed,
                |b| &b.p_crashed,
                pruning,
                |b| encode::encode_crashed(b),
                board,
                "crashed",
            )?,
            PositionClass::Contact => self.evaluate_net(
                |b| &b.contact,
                |b| &b.p_contact,
                pruning,
                |b| encode::encode_contact(b),
                board,
                "contact",
            )?,
        };
        Ok(canonicalize(raw))
    }

    /// S3: a side with zero checkers on board has already finished; by
    /// convention the empty side's own evaluation reads as all-zero and
    /// the complement (the still-occupied side) reads as an outright win.
    fn evaluate_over(&self, board: &Board) -> [f32; 5] {
        if board.total(0) == 0 {
            [0.0, 0.0, 0.0, 0.0, 0.0]
        } else {
            [1.0, 1.0, 1.0, 1.0, 1.0]
        }
    }

    fn evaluate_two_sided(&self, db: &TwoSidedDb, board: &Board) -> Result<[f32; 5]> {
        let side0 = home_slice(board, 0);
        let side1 = home_slice(board, 1);
        db.evaluate(&side0, &side1)
    }

    fn evaluate_one_sided_or_race(&self, board: &Board, pruning: bool) -> Result<[f32; 5]> {
        match &self.bearoff_one_sided {
            Some(db) => {
                let side0 = home_slice(board, 0);
                let side1 = home_slice(board, 1);
                match db.evaluate(&side0, &side1) {
                    Ok(out) => Ok(out),
                    Err(EvalError::BearoffOutOfRange(reason)) => {
                        log::warn!("one-sided bearoff miss ({reason}), falling back to race net");
                        self.evaluate_race(board, pruning)
                    }
                    Err(e) => Err(e),
                }
            }
            None => self.evaluate_race(board, pruning),
        }
    }

    fn evaluate_race(&self, board: &Board, pruning: bool) -> Result<[f32; 5]> {
        let Some(weights) = &self.weights else {
            return Err(EvalError::WeightUnavailable("race".into()));
        };
        let net = if pruning { &weights.p_race } else { &weights.race };
        let input = encode::encode_race(board)?;
        run_network(net, &input)
    }

    fn evaluate_net(
        &self,
        full: impl Fn(&WeightsBundle) -> &Network,
        pruned: impl Fn(&WeightsBundle) -> &Network,
        pruning: bool,
        encode: impl Fn(&Board) -> [f32; crate::INPUTS_CONTACT],
        board: &Board,
        name: &str,
    ) -> Result<[f32; 5]> {
        let Some(weights) = &self.weights else {
            return Err(EvalError::WeightUnavailable(name.into()));
        };
        let net = if pruning { pruned(weights) } else { full(weights) };
        let input = encode(board);
        run_network(net, &input)
    }
}

fn run_network(net: &Network, input: &[f32]) -> Result<[f32; 5]> {
    let mut hidden = vec![0f32; net.c_hidden];
    let mut output = [0f32; 5];
    net.forward(input, &mut hidden, &mut output)?;
    Ok(output)
}

fn home_slice(board: &Board, side: usize) -> [u8; HOME_POINTS] {
    let mut home = [0u8; HOME_POINTS];
    home.copy_from_slice(&board.side(side)[0..HOME_POINTS]);
    home
}

/// clamps each output to [0,1] and enforces the conditional-accumulation
/// monotonicity `backgammon ≤ gammon ≤ win` in both directions.
fn canonicalize(mut out: [f32; 5]) -> [f32; 5] {
    for v in out.iter_mut() {
        *v = v.clamp(0.0, 1.0);
    }
    out[1] = out[1].min(out[0]);
    out[2] = out[2].min(out[1]);
    out[3] = out[3].min(1.0 - out[0]);
    out[4] = out[4].min(out[3]);
    out
}

/// cubeless money equity from a canonical five-float output, on the usual
/// ±1 scale (a certain plain win is +1, a certain plain loss is -1).
pub fn money_equity(out: [f32; 5]) -> f32 {
    let [win, wg, wbg, lg, lbg] = out;
    win * (1.0 + wg + wbg) - (1.0 - win) * (1.0 + lg + lbg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::N_LOCATIONS;

    #[test]
    fn over_position_returns_game_result_for_empty_side() {
        let evaluator = Evaluator::new(None, None, None, false);
        let mut side1 = [0u8; N_LOCATIONS];
        side1[0] = 15;
        let board = Board::new([0; N_LOCATIONS], side1);
        let out = evaluator.evaluate(&board).unwrap();
        assert_eq!(out, [0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn no_weights_reports_unavailable_instead_of_a_silent_default() {
        let evaluator = Evaluator::new(None, None, None, false);
        let board = Board::standard_starting();
        let err = evaluator.evaluate(&board).unwrap_err();
        assert!(matches!(err, EvalError::WeightUnavailable(_)));
    }

    #[test]
    fn canonicalize_enforces_monotonicity() {
        let out = canonicalize([0.5, 0.9, 0.95, 0.9, 0.95]);
        assert!(out[2] <= out[1]);
        assert!(out[1] <= out[0] || out[0] == 0.5);
    }

    #[test]
    fn canonicalize_keeps_lose_side_ordered_on_asymmetric_input() {
        // loseBackgammon (0.4) starts above loseGammon (0.3); clamping must
        // bring loseGammon up to the 1-win ceiling first, then cap
        // loseBackgammon by the (now possibly lower) loseGammon, never the
        // other way around.
        let out = canonicalize([0.2, 0.0, 0.0, 0.3, 0.4]);
        assert!(out[4] <= out[3]);
        assert!(out[3] <= 1.0 - out[0]);
    }

    #[test]
    fn money_equity_is_zero_at_even_coinflip_no_gammons() {
        let eq = money_equity([0.5, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(eq, 0.0);
    }
}
