//! Tracing initialization.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Set to `json` for one JSON object per event.
pub const LOG_FORMAT_ENV: &str = "DOCS_SEARCH_LOG_FORMAT";

static INIT: Once = Once::new();

/// Initialize tracing. Safe to call multiple times.
pub fn init() {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let filter = EnvFilter::from_default_env().add_directive(
            if is_test {
                tracing::Level::DEBUG
            } else {
                tracing::Level::INFO
            }
            .into(),
        );

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_span_events(FmtSpan::NONE);

        if is_test {
            // Another harness may already own the global subscriber.
            let _ = builder.compact().with_test_writer().try_init();
            return;
        }

        let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|format| format == "json");
        let builder = builder.with_writer(std::io::stderr);

        let result = if json {
            builder.json().try_init()
        } else {
            builder.compact().try_init()
        };
        if let Err(e) = result {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}
