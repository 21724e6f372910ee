//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the exporter.
//! The type derives Serde traits for deserialization from the JSON config
//! file; field names match the file's keys one-to-one.

use serde::{Deserialize, Serialize};

/// Resolved exporter configuration.
///
/// Every field carries a built-in default, so a config file only needs to
/// name the fields it overrides. Fields present in the file replace the
/// default atomically; unknown fields are ignored. The value is built once
/// at startup and treated as read-only afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExporterConfig {
    /// Redis target address (e.g., "127.0.0.1:6379").
    pub redis_addr: String,

    /// Username for AUTH (Redis 6+ ACLs); empty for legacy auth.
    pub redis_user: String,

    /// Password for AUTH; empty disables authentication.
    pub redis_pwd: String,

    /// Sentinel cluster name, when scraping through Sentinel.
    pub sentinel_cluster_name: String,

    /// HTTP listen address. A bare ":port" binds all interfaces.
    pub listen_address: String,

    /// Namespace prefix applied to every exported metric.
    pub namespace: String,

    /// Patterns of keys to check (comma separated glob patterns).
    pub check_keys: String,

    /// Single keys to check (no pattern expansion).
    pub check_single_keys: String,

    /// Patterns of streams to check.
    pub check_streams: String,

    /// Single streams to check.
    pub check_single_streams: String,

    /// Patterns of keys whose matches are counted.
    pub count_keys: String,

    /// Path to a Lua script executed per scrape; empty disables it.
    pub script_path: String,

    /// HTTP path the metrics are served on.
    pub metric_path: String,

    /// Log output format: "json" or "txt".
    pub log_format: String,

    /// Enable debug logging.
    pub is_debug: bool,

    /// Name of the CONFIG command (may be renamed on hardened servers).
    pub config_command: String,

    /// Connection timeout as a duration expression (e.g., "15s", "500ms").
    pub connection_timeout: String,

    /// Client TLS private key path; must be paired with the cert file.
    pub tls_client_key_file: String,

    /// Client TLS certificate path; must be paired with the key file.
    pub tls_client_cert_file: String,

    /// CA certificate bundle used to verify the Redis server.
    pub tls_ca_cert_file: String,

    /// Server TLS private key path; with the cert file, enables HTTPS.
    pub tls_server_key_file: String,

    /// Server TLS certificate path; with the key file, enables HTTPS.
    pub tls_server_cert_file: String,

    /// Issue CLIENT SETNAME on every connection.
    pub set_client_name: bool,

    /// Target is a Tile38 server.
    pub is_tile_38: bool,

    /// Export the CLIENT LIST output as metrics.
    pub export_client_list: bool,

    /// Print build identity and exit without serving.
    pub show_version: bool,

    /// Expose only Redis metrics on an isolated registry.
    pub redis_metrics_only: bool,

    /// PING the server as soon as a connection is established.
    pub ping_on_connect: bool,

    /// Include system metrics (e.g., total_system_memory_bytes).
    pub incl_system_metrics: bool,

    /// Skip verification of the Redis server certificate.
    pub skip_tls_verification: bool,

    /// Sub-system name label attached to exported metrics.
    pub sub_system_name: String,

    /// Sub-system id label attached to exported metrics.
    pub sub_system_id: String,

    /// Cluster name label attached to exported metrics.
    pub cluster_name: String,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            redis_addr: "127.0.0.1:6379".to_string(),
            redis_user: String::new(),
            redis_pwd: String::new(),
            sentinel_cluster_name: String::new(),
            listen_address: ":9121".to_string(),
            namespace: "redis".to_string(),
            check_keys: String::new(),
            check_single_keys: String::new(),
            check_streams: String::new(),
            check_single_streams: String::new(),
            count_keys: String::new(),
            script_path: String::new(),
            metric_path: "/metrics".to_string(),
            log_format: "txt".to_string(),
            is_debug: false,
            config_command: "CONFIG".to_string(),
            connection_timeout: "15s".to_string(),
            tls_client_key_file: String::new(),
            tls_client_cert_file: String::new(),
            tls_ca_cert_file: String::new(),
            tls_server_key_file: String::new(),
            tls_server_cert_file: String::new(),
            set_client_name: true,
            is_tile_38: false,
            export_client_list: false,
            show_version: false,
            redis_metrics_only: false,
            ping_on_connect: false,
            incl_system_metrics: false,
            skip_tls_verification: false,
            sub_system_name: String::new(),
            sub_system_id: String::new(),
            cluster_name: String::new(),
        }
    }
}
