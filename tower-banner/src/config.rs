use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use shot_banner::DEFAULT_MAX_ATTEMPTS;
use tracing_subscriber::EnvFilter;

/// Serve advertising banners with per-banner show budgets.
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Banner configuration: `identifier;budget;category...` per line
    #[arg(long, default_value = "config.csv")]
    pub config: PathBuf,

    /// Deadline for asynchronous inner services (e.g. `500ms`, `2s`); selection
    /// itself completes before the deadline starts
    #[arg(long, default_value = "500ms", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Requests served at once before new ones are shed
    #[arg(long, default_value_t = 1024)]
    pub concurrency: usize,

    /// Selection attempts per request when banners run out concurrently
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, default_value = "debug")]
    pub log_level: String,
}

impl ServerArgs {
    /// `host:port`, as accepted by `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Installs the global `tracing` subscriber. `RUST_LOG` takes precedence over
/// `default_filter`.
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();
}
