//! The option contract consumed by the exporter's constructor.

use std::time::Duration;

use prometheus::Registry;

use crate::build_info::BuildInfo;
use crate::net::tls::TlsMaterial;

/// Fully validated options handed to [`Exporter::new`](super::Exporter::new).
///
/// Built by the bootstrapper's option translation from the resolved
/// configuration, so the exporter never sees the config file's field names.
/// Moved into the exporter on construction and not retained elsewhere.
#[derive(Debug)]
pub struct Options {
    /// AUTH username; empty for password-only auth.
    pub user: String,

    /// AUTH password; empty disables authentication.
    pub password: String,

    /// Namespace prefix for every exported metric.
    pub namespace: String,

    /// Name of the CONFIG command on the target server.
    pub config_command_name: String,

    /// Key patterns to check.
    pub check_keys: String,

    /// Single keys to check.
    pub check_single_keys: String,

    /// Stream patterns to check.
    pub check_streams: String,

    /// Single streams to check.
    pub check_single_streams: String,

    /// Key patterns whose matches are counted.
    pub count_keys: String,

    /// Lua script run per scrape; `None` when not configured.
    pub lua_script: Option<Vec<u8>>,

    /// Include system metrics in the scrape.
    pub incl_system_metrics: bool,

    /// Issue CLIENT SETNAME on every connection.
    pub set_client_name: bool,

    /// Target is a Tile38 server.
    pub is_tile38: bool,

    /// Export CLIENT LIST output as metrics.
    pub export_client_list: bool,

    /// Skip verification of the server certificate when dialing TLS.
    pub skip_tls_verification: bool,

    /// Loaded TLS material for both dialing Redis and the HTTPS listener.
    pub tls: TlsMaterial,

    /// Timeout applied to connection establishment and handshake.
    pub connection_timeout: Duration,

    /// HTTP path the metrics are served on.
    pub metrics_path: String,

    /// The exporter's metrics live on an isolated registry.
    pub redis_metrics_only: bool,

    /// PING as soon as a connection is established.
    pub ping_on_connect: bool,

    /// Registry all exporter metrics are registered into.
    pub registry: Registry,

    /// Identity of the running binary, exported as a metric.
    pub build_info: BuildInfo,

    /// Sub-system id label.
    pub sub_system_id: String,

    /// Sub-system name label.
    pub sub_system_name: String,

    /// Cluster name label.
    pub cluster_name: String,
}
