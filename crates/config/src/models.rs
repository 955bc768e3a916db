use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub scanner: ScannerSettings,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub reachability: ReachabilitySettings,
    #[serde(default)]
    pub identifier: IdentifierSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScannerSettings {
    #[serde(default = "super::defaults::max_workers")]
    pub max_workers: usize,
    #[serde(default = "super::defaults::request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "super::defaults::batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub use_db: bool,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default = "super::defaults::exclude_domains")]
    pub exclude_domains: Vec<String>,
}

impl ScannerSettings {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpSettings {
    #[serde(default = "super::defaults::user_agent")]
    pub user_agent: String,
    #[serde(default = "super::defaults::request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl HttpSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReachabilitySettings {
    #[serde(default = "super::defaults::reachability_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "super::defaults::max_redirects")]
    pub max_redirects: usize,
}

impl ReachabilitySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentifierSettings {
    #[serde(default = "super::defaults::lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,
    #[serde(default = "super::defaults::api_enabled")]
    pub api_enabled: bool,
    #[serde(default = "super::defaults::api_base_url")]
    pub api_base_url: String,
    #[serde(default = "super::defaults::api_timeout_secs")]
    pub api_timeout_secs: u64,
    #[serde(default = "super::defaults::entries_db_path")]
    pub entries_db_path: String,
    #[serde(default)]
    pub use_remote_db: bool,
    #[serde(default = "super::defaults::remote_db_url")]
    pub remote_db_url: String,
}

impl IdentifierSettings {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Jsonl,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Jsonl => "jsonl",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "super::defaults::storage_backend")]
    pub backend: StorageBackend,
    #[serde(default = "super::defaults::storage_path")]
    pub path: String,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            max_workers: super::defaults::max_workers(),
            request_delay_ms: super::defaults::request_delay_ms(),
            batch_size: super::defaults::batch_size(),
            use_db: false,
            verbose: false,
            exclude_domains: super::defaults::exclude_domains(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: super::defaults::user_agent(),
            request_timeout_secs: super::defaults::request_timeout_secs(),
        }
    }
}

impl Default for ReachabilitySettings {
    fn default() -> Self {
        Self {
            timeout_secs: super::defaults::reachability_timeout_secs(),
            max_redirects: super::defaults::max_redirects(),
        }
    }
}

impl Default for IdentifierSettings {
    fn default() -> Self {
        Self {
            lookup_timeout_secs: super::defaults::lookup_timeout_secs(),
            api_enabled: super::defaults::api_enabled(),
            api_base_url: super::defaults::api_base_url(),
            api_timeout_secs: super::defaults::api_timeout_secs(),
            entries_db_path: super::defaults::entries_db_path(),
            use_remote_db: false,
            remote_db_url: super::defaults::remote_db_url(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: super::defaults::storage_backend(),
            path: super::defaults::storage_path(),
        }
    }
}
