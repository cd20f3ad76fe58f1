//! `catalog-server`: serves the configured datasets over HTTP and reloads them
//! when the configuration file changes.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use catalog_server::{
    CatalogService, NetworkConfig, NetworkModule, ReloadController, ShutdownSignal,
};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "catalog-server", version, about)]
struct Args {
    /// Path to the dataset configuration JSON file.
    #[arg(long = "config", env = "CATALOG_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Configuration path given positionally; `--config` wins when both are set.
    #[arg(value_name = "CONFIG")]
    config_positional: Option<PathBuf>,

    /// Bind address.
    #[arg(long, env = "CATALOG_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Listen port; 0 lets the OS pick one.
    #[arg(long, env = "CATALOG_PORT", default_value_t = 8080)]
    port: u16,

    /// Maximum time to answer a request.
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,

    /// Quiet period before a configuration change triggers a reload.
    #[arg(long, default_value_t = 250)]
    watch_debounce_ms: u64,

    /// Do not watch the configuration file for changes.
    #[arg(long)]
    no_watch: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

impl Args {
    fn config_path(&self) -> anyhow::Result<PathBuf> {
        self.config
            .clone()
            .or_else(|| self.config_positional.clone())
            .context("a configuration path is required (--config, CATALOG_CONFIG_PATH, or positional)")
    }

    fn network_config(&self) -> NetworkConfig {
        NetworkConfig {
            host: self.host.clone(),
            port: self.port,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..NetworkConfig::default()
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    match format {
        LogFormat::Pretty => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    let config_path = args.config_path()?;
    let controller = Arc::new(ReloadController::new(&config_path));
    controller
        .initialize()
        .with_context(|| format!("failed to load configuration {}", config_path.display()))?;

    if args.no_watch {
        info!("configuration watching disabled");
    } else {
        controller
            .watch(Duration::from_millis(args.watch_debounce_ms))
            .context("failed to watch configuration file")?;
    }

    let service = CatalogService::new(Arc::clone(&controller));
    let mut network = NetworkModule::new(args.network_config(), service);
    let port = network.start().await?;
    info!(host = %args.host, port, "catalog server listening");

    network.serve(ShutdownSignal::install().wait()).await?;
    controller.shutdown();
    info!("catalog server stopped");
    Ok(())
}
