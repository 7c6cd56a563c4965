//! C5: the fixed two-layer sigmoid MLP (§4.5) and its weight loader (§4.6).

mod loader;

use crate::error::{EvalError, Result};
use crate::Arbitrary;
use std::sync::OnceLock;

pub use loader::WeightsBundle;

const SIGMOID_TABLE_SIZE: usize = 8192;
const SIGMOID_RANGE: f32 = 8.0;

static SIGMOID_TABLE: OnceLock<[f32; SIGMOID_TABLE_SIZE]> = OnceLock::new();

fn sigmoid_table() -> &'static [f32; SIGMOID_TABLE_SIZE] {
    SIGMOID_TABLE.get_or_init(|| {
        let mut table = [0f32; SIGMOID_TABLE_SIZE];
        for (i, slot) in table.iter_mut().enumerate() {
            let x = -SIGMOID_RANGE + (2.0 * SIGMOID_RANGE) * i as f32 / (SIGMOID_TABLE_SIZE - 1) as f32;
            *slot = sigmoid_exact(x);
        }
        table
    })
}

/// `σ(x) = 1 / (1 + e^x)` — note the spec's convention has the sign baked
/// into the argument; callers pass `-β·acc` to get the usual logistic curve.
pub fn sigmoid_exact(x: f32) -> f32 {
    1.0 / (1.0 + x.exp())
}

/// linearly-interpolated 8192-entry lookup, accurate to ≤1e-3 on [-8, 8]
/// and clamped (saturating) outside that range.
pub fn sigmoid_approx(x: f32) -> f32 {
    let clamped = x.clamp(-SIGMOID_RANGE, SIGMOID_RANGE);
    let pos = (clamped + SIGMOID_RANGE) / (2.0 * SIGMOID_RANGE) * (SIGMOID_TABLE_SIZE - 1) as f32;
    let table = sigmoid_table();
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(SIGMOID_TABLE_SIZE - 1);
    let frac = pos - lo as f32;
    table[lo] * (1.0 - frac) + table[hi] * frac
}

/// A two-layer sigmoid MLP with fixed topology (§3 "Network").
/// `hidden_weight` is input-major (`W[i*cHidden + j]`), `output_weight` is
/// output-major (`W[k*cHidden + j]`).
#[derive(Debug, Clone)]
pub struct Network {
    pub c_input: usize,
    pub c_hidden: usize,
    pub c_output: usize,
    pub beta_hidden: f32,
    pub beta_output: f32,
    pub hidden_weight: Vec<f32>,
    pub output_weight: Vec<f32>,
    pub hidden_threshold: Vec<f32>,
    pub output_threshold: Vec<f32>,
}

impl Network {
    /// §4.5 forward pass. `hidden_scratch` and `output` are caller-owned
    /// buffers (no allocation on the hot path); `input` must have exactly
    /// `c_input` entries and `input[i] == 0.0` rows are skipped entirely.
    pub fn forward(&self, input: &[f32], hidden_scratch: &mut [f32], output: &mut [f32]) -> Result<()> {
        if input.len() != self.c_input {
            return Err(EvalError::InputShape(format!(
                "expected {} inputs, got {}",
                self.c_input,
                input.len()
            )));
        }
        if hidden_scratch.len() != self.c_hidden || output.len() != self.c_output {
            return Err(EvalError::InputShape(
                "scratch/output buffer does not match network shape".into(),
            ));
        }

        hidden_scratch.copy_from_slice(&self.hidden_threshold);
        for (i, &a) in input.iter().enumerate() {
            if a == 0.0 {
                continue;
            }
            let row = &self.hidden_weight[i * self.c_hidden..(i + 1) * self.c_hidden];
            if a == 1.0 {
                for (h, &w) in hidden_scratch.iter_mut().zip(row) {
                    *h += w;
                }
            } else {
                for (h, &w) in hidden_scratch.iter_mut().zip(row) {
                    *h += a * w;
                }
            }
        }
        for h in hidden_scratch.iter_mut() {
            *h = sigmoid_exact(-self.beta_hidden * *h);
        }

        for (k, out) in output.iter_mut().enumerate() {
            let row = &self.output_weight[k * self.c_hidden..(k + 1) * self.c_hidden];
            let acc: f32 = self.output_threshold[k]
                + hidden_scratch.iter().zip(row).map(|(h, w)| h * w).sum::<f32>();
            *out = sigmoid_exact(-self.beta_output * acc);
        }
        Ok(())
    }

    pub(crate) fn validate(&self, expected_input: usize, name: &str) -> Result<()> {
        if self.c_input != expected_input {
            return Err(EvalError::WeightFormatError(format!(
                "{name}: expected {expected_input} inputs, got {}",
                self.c_input
            )));
        }
        if self.c_output != crate::OUTPUTS {
            return Err(EvalError::WeightFormatError(format!(
                "{name}: expected {} outputs, got {}",
                crate::OUTPUTS,
                self.c_output
            )));
        }
        if self.c_hidden < 1 {
            return Err(EvalError::WeightFormatError(format!("{name}: cHidden must be >= 1")));
        }
        if self.beta_hidden <= 0.0 || self.beta_output <= 0.0 {
            return Err(EvalError::WeightFormatError(format!("{name}: betas must be positive")));
        }
        if self.hidden_weight.len() != self.c_input * self.c_hidden
            || self.output_weight.len() != self.c_hidden * self.c_output
            || self.hidden_threshold.len() != self.c_hidden
            || self.output_threshold.len() != self.c_output
        {
            return Err(EvalError::WeightFormatError(format!("{name}: weight array length mismatch")));
        }
        Ok(())
    }
}

/// a random, validly-shaped network with a small hidden layer — for
/// round-trip and shape tests that want real variation rather than a
/// hand-picked constant (§2.1 ambient test tooling).
impl Arbitrary for Network {
    fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::rng();
        let c_input = rng.random_range(1..=16);
        let c_hidden = rng.random_range(1..=8);
        let c_output = crate::OUTPUTS;
        let weight = |rng: &mut rand::rngs::ThreadRng, n: usize| -> Vec<f32> {
            (0..n).map(|_| rng.random_range(-1.0..1.0)).collect()
        };
        Network {
            c_input,
            c_hidden,
            c_output,
            beta_hidden: rng.random_range(0.1..2.0),
            beta_output: rng.random_range(0.1..2.0),
            hidden_weight: weight(&mut rng, c_input * c_hidden),
            output_weight: weight(&mut rng, c_hidden * c_output),
            hidden_threshold: weight(&mut rng, c_hidden),
            output_threshold: weight(&mut rng, c_output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_lookup_matches_exact_within_tolerance() {
        let mut x = -8.0f32;
        while x <= 8.0 {
            let exact = sigmoid_exact(x);
            let approx = sigmoid_approx(x);
            assert!((exact - approx).abs() <= 1e-3, "x={x} exact={exact} approx={approx}");
            x += 0.01;
        }
    }

    fn toy_network() -> Network {
        Network {
            c_input: 2,
            c_hidden: 2,
            c_output: 1,
            beta_hidden: 1.0,
            beta_output: 1.0,
            hidden_weight: vec![1.0, 0.5, -1.0, 2.0],
            output_weight: vec![1.0, 1.0],
            hidden_threshold: vec![0.0, 0.0],
            output_threshold: vec![0.0],
        }
    }

    #[test]
    fn forward_skips_zero_inputs() {
        let net = toy_network();
        let mut hidden_a = [0f32; 2];
        let mut out_a = [0f32; 1];
        net.forward(&[0.0, 0.0], &mut hidden_a, &mut out_a).unwrap();
        // with all-zero input, hidden accumulation stays exactly at the
        // threshold (0), so each hidden unit is sigmoid(0) == 0.5; those
        // still pass through the output layer's own weights and sigmoid,
        // landing at sigmoid(-1 * (0.5 + 0.5)) == sigmoid(-1).
        let expected = sigmoid_exact(-1.0);
        assert!((out_a[0] - expected).abs() < 1e-6);
    }

    #[test]
    fn forward_rejects_mismatched_input_length() {
        let net = toy_network();
        let mut hidden = [0f32; 2];
        let mut out = [0f32; 1];
        assert!(net.forward(&[0.0], &mut hidden, &mut out).is_err());
    }
}
