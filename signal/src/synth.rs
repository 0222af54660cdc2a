//! Signal synthesis.
//!
//! Folds momentum and a liquidity penalty into one bounded strength score
//! and maps it onto a discrete recommendation:
//!
//! ```text
//! strength = clamp(50 + momentum_weight * momentum
//!                     - spread_weight * spread_percentage, 0, 100)
//! ```
//!
//! The score is monotonic in momentum and penalized by a wide spread. A
//! missing spread percentage contributes no penalty: an unformed book is
//! unknown liquidity, not bad liquidity.
//!
//! Weights and thresholds are configuration, never constants baked into
//! call sites; the default values are a documented choice (DESIGN.md).

use serde::{Deserialize, Serialize};

use market::pulse::momentum::MomentumReading;
use market::pulse::spread::SpreadReading;
use store::model::{RecommendedAction, SignalDraft};

/// Midpoint of the strength range: no momentum, no penalty.
pub const NEUTRAL_STRENGTH: f64 = 50.0;

/// Scoring weights and action thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SynthConfig {
    pub momentum_weight: f64,
    pub spread_weight: f64,
    /// Strength at or above this recommends buying.
    pub buy_threshold: f64,
    /// Strength at or below this recommends selling.
    pub sell_threshold: f64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            momentum_weight: 10.0,
            spread_weight: 5.0,
            buy_threshold: 60.0,
            sell_threshold: 40.0,
        }
    }
}

/// Bounded strength score in `[0, 100]`.
pub fn strength(momentum: f64, spread_percentage: Option<f64>, config: &SynthConfig) -> f64 {
    let penalty = config.spread_weight * spread_percentage.unwrap_or(0.0);

    (NEUTRAL_STRENGTH + config.momentum_weight * momentum - penalty).clamp(0.0, 100.0)
}

/// Map a strength score onto a discrete recommendation.
pub fn action_for(strength: f64, config: &SynthConfig) -> RecommendedAction {
    debug_assert!(
        config.sell_threshold <= config.buy_threshold,
        "inverted action thresholds"
    );

    if strength >= config.buy_threshold {
        RecommendedAction::Buy
    } else if strength <= config.sell_threshold {
        RecommendedAction::Sell
    } else {
        RecommendedAction::Hold
    }
}

/// Combine one EMA update and its matching spread analysis into a signal
/// draft ready for persistence.
pub fn synthesize(
    momentum: &MomentumReading,
    spread: &SpreadReading,
    config: &SynthConfig,
) -> SignalDraft {
    let signal_strength = strength(momentum.momentum, spread.spread_percentage, config);

    SignalDraft {
        ts_ms: momentum.ts_ms,
        price: momentum.price,
        momentum: momentum.momentum,
        spread: spread.spread,
        spread_percentage: spread.spread_percentage,
        signal_strength,
        recommended_action: action_for(signal_strength, config),
    }
}
