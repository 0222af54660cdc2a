//! Spread pulse.
//!
//! Measures the bid/ask spread of a quote update and normalizes it against
//! the book midpoint:
//!
//! ```text
//! spread            = best_ask - best_bid
//! spread_percentage = spread / ((best_bid + best_ask) / 2) * 100
//! ```
//!
//! A half-formed book (either side absent) is a valid market state, not an
//! error: both derived fields are `None`. A crossed book (bid above ask) is
//! also market state: the reading keeps the negative spread as-is and sets
//! `crossed` so downstream consumers can gate on it.

/// Rounding configuration for the percentage field.
#[derive(Clone, Copy, Debug)]
pub struct SpreadConfig {
    /// Decimal places kept on `spread_percentage`. Matches the persisted
    /// column scale.
    pub round_decimals: u32,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self { round_decimals: 2 }
    }
}

/// One spread analysis, emitted per quote update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpreadReading {
    pub ts_ms: u64,
    pub best_bid: Option<f64>,
    pub best_ask: Option<f64>,
    /// `None` iff either book side is missing.
    pub spread: Option<f64>,
    /// `None` when `spread` is, or when the midpoint is not positive.
    pub spread_percentage: Option<f64>,
    pub volume: Option<f64>,
    /// Bid above ask. Recorded as-is, never clamped.
    pub crossed: bool,
}

/// Spread analyzer. Stateless; kept as a struct for its config and for
/// symmetry with the other pulses.
pub struct SpreadPulse {
    config: SpreadConfig,
}

impl SpreadPulse {
    pub fn new(config: SpreadConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(
        &self,
        ts_ms: u64,
        best_bid: Option<f64>,
        best_ask: Option<f64>,
        volume: Option<f64>,
    ) -> SpreadReading {
        let (spread, spread_percentage, crossed) = match (best_bid, best_ask) {
            (Some(bid), Some(ask)) => {
                let spread = ask - bid;
                let midpoint = (bid + ask) / 2.0;

                let pct = if midpoint > 0.0 {
                    Some(round_dp(
                        spread / midpoint * 100.0,
                        self.config.round_decimals,
                    ))
                } else {
                    None
                };

                (Some(spread), pct, spread < 0.0)
            }
            _ => (None, None, false),
        };

        SpreadReading {
            ts_ms,
            best_bid,
            best_ask,
            spread,
            spread_percentage,
            volume,
            crossed,
        }
    }
}

fn round_dp(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
