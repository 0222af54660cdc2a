//! Persisted record types.
//!
//! All four tables are append-only logs: rows are immutable once written,
//! never updated or deleted by the engine, and ids are assigned by the
//! storage layer so retried inserts cannot collide.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Discrete recommendation carried by a trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendedAction {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecommendedAction::Buy => "BUY",
            RecommendedAction::Sell => "SELL",
            RecommendedAction::Hold => "HOLD",
        };
        f.write_str(s)
    }
}

impl FromStr for RecommendedAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(RecommendedAction::Buy),
            "SELL" => Ok(RecommendedAction::Sell),
            "HOLD" => Ok(RecommendedAction::Hold),
            other => Err(anyhow::anyhow!("invalid recommended action: {}", other)),
        }
    }
}

/// One persisted tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceMoment {
    pub id: i64,
    pub instrument: String,
    pub ts_ms: u64,
    pub price: f64,
    pub volume: f64,
    pub best_bid: Option<f64>,
    pub best_ask: Option<f64>,
}

/// One persisted EMA update.
#[derive(Debug, Clone, PartialEq)]
pub struct EmaCalculation {
    pub id: i64,
    pub instrument: String,
    pub ts_ms: u64,
    pub price: f64,
    pub ema_short: f64,
    pub ema_long: f64,
    pub momentum: f64,
}

/// One persisted spread analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadAnalysis {
    pub id: i64,
    pub instrument: String,
    pub ts_ms: u64,
    pub best_bid: Option<f64>,
    pub best_ask: Option<f64>,
    pub spread: Option<f64>,
    pub spread_percentage: Option<f64>,
    pub volume: Option<f64>,
    pub crossed: bool,
}

/// Fields of a trading signal before storage assigns its id.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDraft {
    pub ts_ms: u64,
    pub price: f64,
    pub momentum: f64,
    pub spread: Option<f64>,
    pub spread_percentage: Option<f64>,
    pub signal_strength: f64,
    pub recommended_action: RecommendedAction,
}

/// One persisted trading signal. Strategy collaborators consume these
/// read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradingSignal {
    pub id: i64,
    pub instrument: String,
    pub ts_ms: u64,
    pub price: f64,
    pub momentum: f64,
    pub spread: Option<f64>,
    pub spread_percentage: Option<f64>,
    pub signal_strength: f64,
    pub recommended_action: RecommendedAction,
}
