//! Engine configuration surface.
//!
//! Every tunable the pipeline exposes lives here: EMA periods, scoring
//! weights, action thresholds, percentage rounding, and the ingest queue
//! capacity. Values can come from code or from the environment.

use std::str::FromStr;

use market::pulse::momentum::EmaPeriods;
use market::pulse::spread::SpreadConfig;

use crate::synth::SynthConfig;

/// Configuration knobs for the signal engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub periods: EmaPeriods,
    pub spread: SpreadConfig,
    pub synth: SynthConfig,

    /// Capacity of each per-instrument ingest channel.
    ///
    /// Acts as backpressure: when persistence lags, the producer for that
    /// instrument blocks instead of dropping ticks. A lost tick would
    /// corrupt the EMA recurrence irrecoverably.
    pub queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            periods: EmaPeriods::default(),
            spread: SpreadConfig::default(),
            synth: SynthConfig::default(),
            queue_capacity: 256,
        }
    }
}

impl EngineConfig {
    /// Build a config from the environment, falling back to defaults for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            periods: EmaPeriods {
                short: env_parse("EMA_SHORT_PERIOD", defaults.periods.short),
                long: env_parse("EMA_LONG_PERIOD", defaults.periods.long),
            },
            spread: SpreadConfig {
                round_decimals: env_parse(
                    "SPREAD_ROUND_DECIMALS",
                    defaults.spread.round_decimals,
                ),
            },
            synth: SynthConfig {
                momentum_weight: env_parse("MOMENTUM_WEIGHT", defaults.synth.momentum_weight),
                spread_weight: env_parse("SPREAD_WEIGHT", defaults.synth.spread_weight),
                buy_threshold: env_parse("BUY_THRESHOLD", defaults.synth.buy_threshold),
                sell_threshold: env_parse("SELL_THRESHOLD", defaults.synth.sell_threshold),
            },
            queue_capacity: env_parse("ENGINE_QUEUE_CAPACITY", defaults.queue_capacity),
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
