use tracing::{Level, Span};

use super::TraceId;

/// Root span for one feed sample window.
pub fn window_span(trace_id: &TraceId) -> Span {
    tracing::span!(
        Level::INFO,
        "sample_window",
        trace_id = %trace_id
    )
}

/// Span for a per-instrument worker task.
pub fn instrument_span(instrument: &str) -> Span {
    tracing::span!(Level::INFO, "instrument_worker", instrument = %instrument)
}
