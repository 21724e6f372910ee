//! Redis Metrics Exporter
//!
//! # Architecture Overview
//!
//! ```text
//! config file (JSON) ──▶ config::loader ──▶ config::validation
//!                                                  │
//!                                                  ▼
//!                          lifecycle::startup (registry selection,
//!                             option translation, listener choice)
//!                                                  │
//!                                                  ▼
//!                             exporter (constructor + HTTP handler)
//!                                │                        │
//!                        connection check            /metrics path
//!                          (PING Redis)          (gather + text encode)
//! ```
//!
//! Startup is strictly sequential: any fault in resolution, validation,
//! translation, or construction aborts the process before the listener
//! opens.

pub mod build_info;
pub mod config;
pub mod exporter;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use build_info::BuildInfo;
pub use config::ExporterConfig;
pub use exporter::{Exporter, Options};
