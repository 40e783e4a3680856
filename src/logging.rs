//! Structured logging to stderr.
//!
//! The filter is read from `PROJECT_RISK_LOG`, then `RUST_LOG`, and falls
//! back to `warn`. Stdout is left to reports.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_DIRECTIVES: &str = "warn";

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let directives = filter_directives(
            std::env::var("PROJECT_RISK_LOG").ok(),
            std::env::var("RUST_LOG").ok(),
        );

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .with_filter(EnvFilter::new(directives)),
        );

        // Another subscriber may already be installed (e.g. by a test harness).
        if subscriber.try_init().is_err() {
            tracing::debug!("tracing subscriber already initialized");
        }
    });
}

fn filter_directives(own: Option<String>, rust_log: Option<String>) -> String {
    let nonblank = |d: &String| !d.trim().is_empty();
    own.filter(nonblank)
        .or(rust_log.filter(nonblank))
        .unwrap_or_else(|| DEFAULT_DIRECTIVES.to_string())
}
