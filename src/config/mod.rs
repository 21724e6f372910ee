//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON)
//!     → loader.rs (defaults + field-by-field overlay)
//!     → validation.rs (cross-field checks, file loading, parsing)
//!     → ExporterConfig (resolved, immutable)
//!     → translated into exporter::Options by the bootstrapper
//! ```
//!
//! # Design Decisions
//! - Config is immutable once resolved; there is no reload path
//! - All fields have defaults so a minimal (or absent-field) config works
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::ExporterConfig;
pub use validation::{Validated, ValidationError};
