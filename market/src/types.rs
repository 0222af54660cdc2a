use std::fmt;

use serde::{Deserialize, Serialize};

/// Exchange contract code, e.g. `UK-BL-MAR-25`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instrument(String);

impl Instrument {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Instrument {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

/// Normalized market event produced by a feed collaborator.
///
/// One tick summarizes one sample window: traded price (volume-weighted
/// over the window), total traded volume, and the state of the touch where
/// the book had limit orders on that side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub instrument: Instrument,
    pub ts_ms: u64,
    pub price: f64,
    pub volume: f64,
    pub best_bid: Option<f64>,
    pub best_ask: Option<f64>,
}
