//! Startup sequence: registry selection, option translation, listener.

use std::net::{AddrParseError, SocketAddr};
use std::path::Path;

use prometheus::Registry;
use thiserror::Error;

use crate::build_info::BuildInfo;
use crate::config::schema::ExporterConfig;
use crate::config::validation::{self, Validated, ValidationError};
use crate::exporter::{ConstructionError, Exporter, Options};
use crate::net::tls;

/// Error type for a failed startup. Every variant is fatal; the binary
/// logs it and exits non-zero.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("couldn't construct exporter: {0}")]
    Construction(#[from] ConstructionError),

    #[error("invalid listen address {addr:?}: {source}")]
    ListenAddress {
        addr: String,
        source: AddrParseError,
    },

    #[error("server error: {0}")]
    Listen(#[from] std::io::Error),
}

/// Pick the registry the exporter registers into: a freshly created one
/// when only Redis metrics should be exposed, the process-wide default
/// otherwise.
pub fn select_registry(metrics_only: bool) -> Registry {
    if metrics_only {
        Registry::new()
    } else {
        prometheus::default_registry().clone()
    }
}

/// Map the resolved configuration and validated material onto the
/// exporter's option contract. Pure renaming; every input is already
/// validated, so this cannot fail.
pub fn translate_options(
    config: &ExporterConfig,
    validated: Validated,
    build_info: BuildInfo,
    registry: Registry,
) -> Options {
    Options {
        user: config.redis_user.clone(),
        password: config.redis_pwd.clone(),
        namespace: config.namespace.clone(),
        config_command_name: config.config_command.clone(),
        check_keys: config.check_keys.clone(),
        check_single_keys: config.check_single_keys.clone(),
        check_streams: config.check_streams.clone(),
        check_single_streams: config.check_single_streams.clone(),
        count_keys: config.count_keys.clone(),
        lua_script: validated.script,
        incl_system_metrics: config.incl_system_metrics,
        set_client_name: config.set_client_name,
        is_tile38: config.is_tile_38,
        export_client_list: config.export_client_list,
        skip_tls_verification: config.skip_tls_verification,
        tls: validated.tls,
        connection_timeout: validated.connection_timeout,
        metrics_path: config.metric_path.clone(),
        redis_metrics_only: config.redis_metrics_only,
        ping_on_connect: config.ping_on_connect,
        registry,
        build_info,
        sub_system_id: config.sub_system_id.clone(),
        sub_system_name: config.sub_system_name.clone(),
        cluster_name: config.cluster_name.clone(),
    }
}

/// Parse a listen address, accepting the bare ":port" form as meaning all
/// interfaces.
pub fn parse_listen_addr(addr: &str) -> Result<SocketAddr, AddrParseError> {
    match addr.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}").parse(),
        None => addr.parse(),
    }
}

/// Validate the configuration, construct the exporter, and serve.
///
/// Blocks for the remainder of the process; only returns on a fatal error.
pub async fn run(config: ExporterConfig) -> Result<(), StartupError> {
    let validated = validation::validate(&config)?;
    let server_cert_file = validated.tls.server_cert_file.clone();
    let server_key_file = validated.tls.server_key_file.clone();
    let serve_tls = validated.tls.has_server_pair();

    let registry = select_registry(config.redis_metrics_only);
    let options = translate_options(&config, validated, BuildInfo::current(), registry);
    let exporter = Exporter::new(config.redis_addr.clone(), options)?;

    let addr = parse_listen_addr(&config.listen_address).map_err(|source| {
        StartupError::ListenAddress {
            addr: config.listen_address.clone(),
            source,
        }
    })?;
    let app = exporter.into_router();

    tracing::info!(
        listen_address = %config.listen_address,
        metrics_path = %config.metric_path,
        "providing metrics"
    );
    tracing::debug!(redis_addr = %config.redis_addr, "configured redis addr");

    if serve_tls {
        tracing::debug!(
            cert = %server_cert_file,
            key = %server_key_file,
            "binding as TLS"
        );
        let tls_config = tls::load_server_config(
            Path::new(&server_cert_file),
            Path::new(&server_key_file),
        )
        .await?;
        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await?;
    } else {
        axum_server::bind(addr)
            .serve(app.into_make_service())
            .await?;
    }

    Ok(())
}
