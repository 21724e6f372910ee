//! Startup orchestration.
//!
//! # Data Flow
//! ```text
//! ExporterConfig (resolved)
//!     → validation (cross-field checks, file loading)
//!     → registry selection (isolated vs. process default)
//!     → option translation (config names → exporter contract)
//!     → Exporter construction
//!     → listener selection (TLS vs. plain) → blocking serve
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, nothing is retried
//! - Steps run strictly in order; no listener opens before they all pass

pub mod startup;

pub use startup::{run, StartupError};
