//! Observability subsystem.
//!
//! The exporter's own telemetry: structured logs via `tracing`, with the
//! output format selected by the configuration. The metrics it *serves*
//! live in the exporter subsystem, not here.

pub mod logging;
