//! Momentum pulse (EMA engine).
//!
//! Maintains per-instrument short/long exponential moving averages and
//! derives momentum from their difference.
//!
//! ## Recurrence
//!
//! ```text
//! k   = 2 / (N + 1)
//! ema = price * k + ema_prev * (1 - k)
//! ```
//!
//! The first valid price seeds both EMAs, so momentum starts at exactly
//! zero and every later value is fully determined by the input order
//! (replay-deterministic).
//!
//! ## Crash recovery
//!
//! `ema_short` / `ema_long` are the full recoverable state. A pulse rebuilt
//! with [`MomentumPulse::resume`] from the last persisted calculation
//! continues the recurrence as if never interrupted.

use super::PulseError;

/// EMA period configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmaPeriods {
    pub short: u32,
    pub long: u32,
}

impl Default for EmaPeriods {
    fn default() -> Self {
        Self {
            short: 12,
            long: 26,
        }
    }
}

impl EmaPeriods {
    pub fn k_short(&self) -> f64 {
        smoothing(self.short)
    }

    pub fn k_long(&self) -> f64 {
        smoothing(self.long)
    }
}

fn smoothing(period: u32) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// One EMA update, emitted per accepted tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MomentumReading {
    pub ts_ms: u64,
    pub price: f64,
    pub ema_short: f64,
    pub ema_long: f64,
    /// Always exactly `ema_short - ema_long`.
    pub momentum: f64,
}

#[derive(Clone, Copy, Debug)]
struct EmaState {
    ema_short: f64,
    ema_long: f64,
}

/// Per-instrument EMA state. One pulse per instrument, single writer.
pub struct MomentumPulse {
    periods: EmaPeriods,
    state: Option<EmaState>,
}

impl MomentumPulse {
    pub fn new(periods: EmaPeriods) -> Self {
        Self {
            periods,
            state: None,
        }
    }

    /// Rebuild a pulse from the last persisted calculation.
    pub fn resume(periods: EmaPeriods, ema_short: f64, ema_long: f64) -> Self {
        Self {
            periods,
            state: Some(EmaState {
                ema_short,
                ema_long,
            }),
        }
    }

    pub fn is_seeded(&self) -> bool {
        self.state.is_some()
    }

    /// Feed one price into the recurrence.
    ///
    /// Non-finite and non-positive prices are rejected without touching
    /// state, so a bad tick never corrupts the series.
    pub fn evaluate(&mut self, ts_ms: u64, price: f64) -> Result<MomentumReading, PulseError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(PulseError::InvalidPrice(price));
        }

        let next = match self.state {
            None => EmaState {
                ema_short: price,
                ema_long: price,
            },
            Some(prev) => EmaState {
                ema_short: ema_step(price, prev.ema_short, self.periods.k_short()),
                ema_long: ema_step(price, prev.ema_long, self.periods.k_long()),
            },
        };

        self.state = Some(next);

        Ok(MomentumReading {
            ts_ms,
            price,
            ema_short: next.ema_short,
            ema_long: next.ema_long,
            momentum: next.ema_short - next.ema_long,
        })
    }
}

fn ema_step(price: f64, prev: f64, k: f64) -> f64 {
    price * k + prev * (1.0 - k)
}
