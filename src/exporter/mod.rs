//! The metrics-collection component.
//!
//! # Data Flow
//! ```text
//! exporter::Options (validated, translated)
//!     → Exporter::new (register metrics into the chosen registry)
//!     → into_router (axum handler owning all request paths)
//!     → per metrics request: connection check → gather → encode
//! ```
//!
//! # Design Decisions
//! - The exporter owns its options; nothing else retains them
//! - A failed connection check is reported as `up 0`, never as an HTTP error
//! - Paths other than the metrics path serve a landing page

pub mod options;
mod scrape;

pub use options::Options;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Opts, TextEncoder};
use thiserror::Error;
use tokio_rustls::TlsConnector;
use tower_http::trace::TraceLayer;

use crate::net::tls::{self, TlsError};

/// Error type for exporter construction.
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("redis target address must not be empty")]
    EmptyTargetAddress,

    #[error("metrics path {0:?} must begin with '/'")]
    InvalidMetricsPath(String),

    #[error("couldn't register exporter metrics: {0}")]
    Registration(#[from] prometheus::Error),

    #[error("invalid TLS client configuration: {0}")]
    Tls(#[from] TlsError),
}

/// The exporter: holds the translated options and serves every HTTP request.
pub struct Exporter {
    redis_addr: String,
    options: Options,
    tls_connector: Option<TlsConnector>,
    up: IntGauge,
    scrape_duration: Gauge,
    scrapes_total: IntCounter,
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("redis_addr", &self.redis_addr)
            .field("options", &self.options)
            .field("tls_connector", &self.tls_connector.is_some())
            .field("up", &self.up)
            .field("scrape_duration", &self.scrape_duration)
            .field("scrapes_total", &self.scrapes_total)
            .finish()
    }
}

impl Exporter {
    /// Construct the exporter from validated options, registering its
    /// metrics into the registry the options carry.
    pub fn new(redis_addr: String, options: Options) -> Result<Self, ConstructionError> {
        if redis_addr.is_empty() {
            return Err(ConstructionError::EmptyTargetAddress);
        }
        if !options.metrics_path.starts_with('/') {
            return Err(ConstructionError::InvalidMetricsPath(
                options.metrics_path.clone(),
            ));
        }

        let tls_connector = if options.tls.dials_tls() {
            let config = tls::client_config(&options.tls, options.skip_tls_verification)?;
            Some(TlsConnector::from(Arc::new(config)))
        } else {
            None
        };

        let namespace = options.namespace.clone();

        let build_info = IntGauge::with_opts(
            Opts::new("exporter_build_info", "Build information of the exporter")
                .namespace(namespace.clone())
                .const_label("version", options.build_info.version.clone())
                .const_label("commit_sha", options.build_info.commit_sha.clone())
                .const_label("build_date", options.build_info.date.clone()),
        )?;
        build_info.set(1);

        let up = IntGauge::with_opts(
            Opts::new("up", "Whether the last connection check to Redis succeeded")
                .namespace(namespace.clone()),
        )?;

        let scrape_duration = Gauge::with_opts(
            Opts::new(
                "exporter_last_scrape_duration_seconds",
                "Duration of the last connection check",
            )
            .namespace(namespace.clone()),
        )?;

        let scrapes_total = IntCounter::with_opts(
            Opts::new("exporter_scrapes_total", "Total number of scrape requests served")
                .namespace(namespace),
        )?;

        let registry = &options.registry;
        registry.register(Box::new(build_info))?;
        registry.register(Box::new(up.clone()))?;
        registry.register(Box::new(scrape_duration.clone()))?;
        registry.register(Box::new(scrapes_total.clone()))?;

        Ok(Self {
            redis_addr,
            options,
            tls_connector,
            up,
            scrape_duration,
            scrapes_total,
        })
    }

    /// Turn the exporter into the router that owns every request path.
    pub fn into_router(self) -> Router {
        let metrics_path = self.options.metrics_path.clone();
        let state = Arc::new(self);
        Router::new()
            .route(&metrics_path, get(serve_metrics))
            .fallback(landing_page)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run a connection check and record its outcome.
    async fn scrape(&self) {
        self.scrapes_total.inc();
        let start = Instant::now();
        match scrape::check_connection(
            &self.redis_addr,
            &self.options,
            self.tls_connector.as_ref(),
        )
        .await
        {
            Ok(()) => self.up.set(1),
            Err(err) => {
                tracing::warn!(
                    redis_addr = %self.redis_addr,
                    error = %err,
                    "connection check failed"
                );
                self.up.set(0);
            }
        }
        self.scrape_duration.set(start.elapsed().as_secs_f64());
    }
}

async fn serve_metrics(State(exporter): State<Arc<Exporter>>) -> Response {
    exporter.scrape().await;

    let metric_families = exporter.options.registry.gather();
    let mut buffer = Vec::new();
    if let Err(err) = TextEncoder::new().encode(&metric_families, &mut buffer) {
        tracing::error!(error = %err, "failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], buffer).into_response()
}

async fn landing_page(State(exporter): State<Arc<Exporter>>) -> Html<String> {
    Html(format!(
        "<html>\
         <head><title>Redis Exporter</title></head>\
         <body>\
         <h1>Redis Exporter</h1>\
         <p><a href='{path}'>Metrics</a></p>\
         </body>\
         </html>",
        path = exporter.options.metrics_path
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use prometheus::Registry;

    use crate::build_info::BuildInfo;
    use crate::net::tls::TlsMaterial;

    fn test_options(registry: Registry) -> Options {
        Options {
            user: String::new(),
            password: String::new(),
            namespace: "redis".to_string(),
            config_command_name: "CONFIG".to_string(),
            check_keys: String::new(),
            check_single_keys: String::new(),
            check_streams: String::new(),
            check_single_streams: String::new(),
            count_keys: String::new(),
            lua_script: None,
            incl_system_metrics: false,
            set_client_name: true,
            is_tile38: false,
            export_client_list: false,
            skip_tls_verification: false,
            tls: TlsMaterial::default(),
            connection_timeout: Duration::from_secs(1),
            metrics_path: "/metrics".to_string(),
            redis_metrics_only: true,
            ping_on_connect: false,
            registry,
            build_info: BuildInfo {
                version: "0.1.0-test".to_string(),
                commit_sha: "deadbeef".to_string(),
                date: "2026-01-01".to_string(),
            },
            sub_system_id: String::new(),
            sub_system_name: String::new(),
            cluster_name: String::new(),
        }
    }

    #[test]
    fn construction_registers_exporter_metrics() {
        let registry = Registry::new();
        let _exporter =
            Exporter::new("127.0.0.1:6379".to_string(), test_options(registry.clone())).unwrap();

        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"redis_exporter_build_info".to_string()));
        assert!(names.contains(&"redis_up".to_string()));
        assert!(names.contains(&"redis_exporter_scrapes_total".to_string()));
    }

    #[test]
    fn empty_target_address_is_rejected() {
        let err = Exporter::new(String::new(), test_options(Registry::new())).unwrap_err();
        assert!(matches!(err, ConstructionError::EmptyTargetAddress));
    }

    #[test]
    fn relative_metrics_path_is_rejected() {
        let mut options = test_options(Registry::new());
        options.metrics_path = "metrics".to_string();
        let err = Exporter::new("127.0.0.1:6379".to_string(), options).unwrap_err();
        assert!(matches!(err, ConstructionError::InvalidMetricsPath(_)));
    }

    #[test]
    fn double_registration_on_one_registry_fails() {
        let registry = Registry::new();
        let _first =
            Exporter::new("127.0.0.1:6379".to_string(), test_options(registry.clone())).unwrap();
        let err = Exporter::new("127.0.0.1:6379".to_string(), test_options(registry)).unwrap_err();
        assert!(matches!(err, ConstructionError::Registration(_)));
    }
}
