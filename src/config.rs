//! Engine construction config (§6 Environment, §2.1 ambient stack).
//!
//! The engine never reads environment variables itself; callers supply
//! paths directly or deserialize an [`EngineConfig`] from JSON.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// path to the neural-network weights file (text or binary, §4.6)
    pub weights_path: PathBuf,
    /// path to the one-sided bearoff database, if available
    pub bearoff_one_sided_path: Option<PathBuf>,
    /// path to the two-sided bearoff database, if available
    pub bearoff_two_sided_path: Option<PathBuf>,
    /// use the cheaper 200-input pruning nets instead of the full nets
    #[serde(default)]
    pub use_pruning: bool,
}

impl EngineConfig {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
