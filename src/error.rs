//! Typed error taxonomy for the evaluation engine (§7).
//!
//! Loading errors are fatal to engine construction; evaluation-time errors
//! prefer graceful degradation over propagation (only `InputShape` aborts
//! an in-flight evaluation).

/// Everything that can go wrong loading or running the evaluator.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// A board failed its invariants (§3): a point holds more than
    /// [`crate::MAX_CHEQUERS`], or a negative count. Indicates a caller bug.
    #[error("board violates shape invariants: {0}")]
    InputShape(String),

    /// Malformed network header, wrong magic, bad dimensions, or a
    /// truncated weights stream (§4.6).
    #[error("malformed weights stream: {0}")]
    WeightFormatError(String),

    /// Evaluation requested a network that was never loaded.
    #[error("network unavailable: {0}")]
    WeightUnavailable(String),

    /// A bearoff lookup fell outside the database's covered positions.
    #[error("position not covered by bearoff database: {0}")]
    BearoffOutOfRange(String),

    /// Propagated verbatim from file access.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EvalError>;
