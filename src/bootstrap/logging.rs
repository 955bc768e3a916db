use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "netweather=info";

/// Installs the global subscriber writing to `NETWEATHER_LOG` (default
/// `netweather.log`), or to stderr when that file cannot be opened
pub fn initialize() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let log_path = std::env::var("NETWEATHER_LOG").unwrap_or_else(|_| "netweather.log".to_string());

    match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            tracing::warn!("Cannot open log file {}: {}, logging to stderr", log_path, e);
        }
    }
}
