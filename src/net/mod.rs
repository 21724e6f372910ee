//! Network layer subsystem.
//!
//! Holds the TLS plumbing shared by both sides of the exporter: loading the
//! client-side material used to reach Redis, and the server-side certificate
//! configuration for the HTTPS listener.

pub mod tls;

pub use tls::{ClientIdentity, TlsError, TlsMaterial};
