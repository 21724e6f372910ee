//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once, before any other subsystem
//! - Select JSON or text output from the configured log format
//! - Let RUST_LOG override the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global subscriber. `log_format` "json" selects JSON
/// events; anything else selects plain text. `is_debug` lowers the default
/// level to debug.
pub fn init(log_format: &str, is_debug: bool) {
    let default_directive = if is_debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let registry = tracing_subscriber::registry().with(filter);
    match log_format {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
