use netweather_config::Config;
use std::time::Duration;

/// Run parameters of the parallel processor
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    pub max_workers: usize,
    /// Pause after each job
    pub request_delay: Duration,
    pub batch_size: usize,
    /// Persist reachability and scan results through the store
    pub use_db: bool,
    pub verbose: bool,
    pub exclude_domains: Vec<String>,
    pub reachability_timeout: Duration,
}

impl ProcessorConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_workers: config.scanner.max_workers,
            request_delay: config.scanner.request_delay(),
            batch_size: config.scanner.batch_size,
            use_db: config.scanner.use_db,
            verbose: config.scanner.verbose,
            exclude_domains: config.scanner.exclude_domains.clone(),
            reachability_timeout: config.reachability.timeout(),
        }
    }

    /// Workers actually started for `jobs` jobs
    pub fn worker_count(&self, jobs: usize) -> usize {
        self.max_workers.min(jobs).max(1)
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
