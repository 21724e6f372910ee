//! Configuration loading from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::ExporterConfig;

/// Error type for configuration resolution.
///
/// A missing file is surfaced distinctly from an unreadable or malformed
/// one so callers can decide whether "run on defaults" is acceptable. The
/// exporter binary treats all three as fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Resolve the configuration: built-in defaults overlaid field-by-field
/// with the JSON file at `path`.
///
/// Fields present in the file replace the default; absent fields keep it.
/// Unknown fields are ignored.
pub fn resolve(path: &Path) -> Result<ExporterConfig, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }
        Err(err) => return Err(ConfigError::Io(err)),
    };

    let config: ExporterConfig = serde_json::from_str(&raw)?;
    Ok(config)
}
