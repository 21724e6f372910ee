use std::path::PathBuf;
use std::process;

use clap::Parser;

use redis_exporter::build_info::BuildInfo;
use redis_exporter::config::loader;
use redis_exporter::lifecycle::startup;
use redis_exporter::observability::logging;

#[derive(Parser)]
#[command(name = "redis-exporter")]
#[command(about = "Prometheus exporter for Redis metrics", long_about = None)]
struct Cli {
    /// Path to the JSON config file.
    #[arg(long = "config-file", default_value = "./redis_exporter.conf")]
    config_file: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logging is configured from the file, so resolution failures can only
    // go to stderr.
    let config = match loader::resolve(&cli.config_file) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("redis-exporter: {err}");
            process::exit(1);
        }
    };

    logging::init(&config.log_format, config.is_debug);

    let build_info = BuildInfo::current();
    tracing::info!(
        version = %build_info.version,
        build_date = %build_info.date,
        sha1 = %build_info.commit_sha,
        config_file = %cli.config_file.display(),
        "Redis Metrics Exporter starting"
    );
    if config.is_debug {
        tracing::debug!("enabling debug output");
    }

    if config.show_version {
        return;
    }

    if let Err(err) = startup::run(config).await {
        tracing::error!(error = %err, "startup failed");
        process::exit(1);
    }
}
