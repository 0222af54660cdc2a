use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize the process-wide logger exactly once.
///
/// Filtering follows `RUST_LOG` and defaults to `info`. Set
/// `LOG_FORMAT=json` for structured output suitable for log aggregation;
/// anything else gets the human-readable formatter.
pub fn init_logger(service_name: &'static str) {
    LOGGER_INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json");

        if json {
            fmt()
                .with_env_filter(filter)
                .with_target(true)
                .json()
                .init();
        } else {
            fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_line_number(true)
                .init();
        }

        tracing::info!(service = service_name, "logger initialized");
    });
}
