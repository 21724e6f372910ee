//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Cross-field invariants (client TLS key/cert must come as a pair)
//! - Parse derived values (connection timeout, certificate files, script)
//!
//! # Design Decisions
//! - First failing sub-check aborts with its specific error kind
//! - Side effects are limited to file reads; every handle is closed before
//!   validation returns
//! - Runs exactly once, between resolution and option translation

use std::fs;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::config::schema::ExporterConfig;
use crate::net::tls::{self, TlsError, TlsMaterial};

/// Error type for semantic validation of the resolved configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("couldn't parse connection timeout {value:?}: {reason}")]
    InvalidDuration { value: String, reason: String },

    #[error("TLS client key file and cert file should both be present")]
    IncompleteTlsPair,

    #[error("couldn't load TLS client key pair: {0}")]
    TlsLoadFailure(#[source] TlsError),

    #[error("couldn't load TLS CA certificate {path}: {source}")]
    CaCertLoadFailure { path: String, source: TlsError },

    #[error("error loading script file {path}: {source}")]
    ScriptLoadFailure {
        path: String,
        source: std::io::Error,
    },
}

/// The values validation derives from the resolved configuration.
#[derive(Debug)]
pub struct Validated {
    pub tls: TlsMaterial,
    pub connection_timeout: Duration,
    pub script: Option<Vec<u8>>,
}

/// Check cross-field invariants and load every file the configuration
/// references. Either all sub-checks pass and a fully populated result is
/// returned, or the first failure aborts the whole validation.
pub fn validate(config: &ExporterConfig) -> Result<Validated, ValidationError> {
    let connection_timeout =
        parse_duration(&config.connection_timeout).map_err(|reason| {
            ValidationError::InvalidDuration {
                value: config.connection_timeout.clone(),
                reason,
            }
        })?;

    if config.tls_client_key_file.is_empty() != config.tls_client_cert_file.is_empty() {
        return Err(ValidationError::IncompleteTlsPair);
    }

    let client_identity = if config.tls_client_key_file.is_empty() {
        None
    } else {
        let identity = tls::load_client_pair(
            Path::new(&config.tls_client_cert_file),
            Path::new(&config.tls_client_key_file),
        )
        .map_err(ValidationError::TlsLoadFailure)?;
        Some(identity)
    };

    let ca_pool = if config.tls_ca_cert_file.is_empty() {
        None
    } else {
        let pool = tls::load_ca_pool(Path::new(&config.tls_ca_cert_file)).map_err(|source| {
            ValidationError::CaCertLoadFailure {
                path: config.tls_ca_cert_file.clone(),
                source,
            }
        })?;
        Some(pool)
    };

    let script = if config.script_path.is_empty() {
        None
    } else {
        let bytes =
            fs::read(&config.script_path).map_err(|source| ValidationError::ScriptLoadFailure {
                path: config.script_path.clone(),
                source,
            })?;
        Some(bytes)
    };

    Ok(Validated {
        tls: TlsMaterial {
            client_identity,
            ca_pool,
            server_cert_file: config.tls_server_cert_file.clone(),
            server_key_file: config.tls_server_key_file.clone(),
        },
        connection_timeout,
        script,
    })
}

/// Parse a duration expression: one or more `<decimal><unit>` segments,
/// e.g. "15s", "500ms", "1m30s". Units: ns, us, ms, s, m, h.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total = Duration::ZERO;
    let mut rest = input;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(format!("expected a number at {rest:?}"));
        }
        let (number, tail) = rest.split_at(number_len);
        let value: f64 = number
            .parse()
            .map_err(|_| format!("invalid number {number:?}"))?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);
        let unit_secs = match unit {
            "ns" => 1e-9,
            "us" | "µs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            "" => return Err(format!("missing unit after {number:?}")),
            other => return Err(format!("unknown unit {other:?}")),
        };

        let segment = Duration::try_from_secs_f64(value * unit_secs)
            .map_err(|_| format!("duration segment {number}{unit} out of range"))?;
        total = total
            .checked_add(segment)
            .ok_or_else(|| "duration out of range".to_string())?;
        rest = next;
    }

    Ok(total)
}
