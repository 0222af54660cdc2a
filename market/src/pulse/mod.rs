pub mod momentum;
pub mod spread;

use thiserror::Error;

/// Errors produced by per-instrument pulses.
#[derive(Debug, Error, PartialEq)]
pub enum PulseError {
    /// Non-positive or non-finite price fed into the EMA recurrence.
    /// The offending tick is rejected and pulse state is left untouched.
    #[error("invalid price for ema update: {0}")]
    InvalidPrice(f64),
}
