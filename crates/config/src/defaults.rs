/// Default values for configuration fields

// Scanner defaults
pub fn max_workers() -> usize {
    10
}

pub fn request_delay_ms() -> u64 {
    0  // No pause between jobs
}

pub fn batch_size() -> usize {
    100
}

pub fn exclude_domains() -> Vec<String> {
    vec![
        "login.microsoftonline.com".to_string(),
        "login.live.com".to_string(),
        "login.microsoft.com".to_string(),
    ]
}

// HTTP defaults
pub fn user_agent() -> String {
    format!("netweather/{}", env!("CARGO_PKG_VERSION"))
}

pub fn request_timeout_secs() -> u64 {
    30
}

// Reachability defaults
pub fn reachability_timeout_secs() -> u64 {
    15
}

pub fn max_redirects() -> usize {
    10
}

// Identifier defaults
pub fn lookup_timeout_secs() -> u64 {
    10  // Deadline for the concurrent checksum lookups
}

pub fn api_enabled() -> bool {
    true
}

pub fn api_base_url() -> String {
    "https://api.publicdata.guru".to_string()
}

pub fn api_timeout_secs() -> u64 {
    5
}

pub fn entries_db_path() -> String {
    "entries.db".to_string()
}

pub fn remote_db_url() -> String {
    "https://raw.githubusercontent.com/schmalle/netweather/main/entries.db".to_string()
}

// Storage defaults
pub fn storage_backend() -> super::models::StorageBackend {
    super::models::StorageBackend::Memory
}

pub fn storage_path() -> String {
    "results.jsonl".to_string()
}

pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# ===============================================================================
# NetWeather Configuration
# ===============================================================================

[scanner]
max_workers = 10                     # Concurrent URL workers
request_delay_ms = 0                 # Pause after each URL (milliseconds, 0 = none)
batch_size = 100                     # Reserved for batched submission
use_db = false                       # Persist reachability and scan results
verbose = false                      # Per-URL detail instead of progress dots

# Hosts never scanned (subdomains included)
exclude_domains = [
    "login.microsoftonline.com",
    "login.live.com",
    "login.microsoft.com",
]

[http]
user_agent = "netweather/0.1.0"      # User-Agent header for every request
request_timeout_secs = 30            # Page and script download timeout

[reachability]
timeout_secs = 15                    # Per-protocol probe timeout
max_redirects = 10                   # Redirect hops followed per probe

# ===============================================================================
# LIBRARY IDENTIFICATION
# ===============================================================================
[identifier]
lookup_timeout_secs = 10             # Deadline for the concurrent checksum lookups
api_enabled = true                   # Query the public checksum API
api_base_url = "https://api.publicdata.guru"
api_timeout_secs = 5                 # Checksum API request timeout
entries_db_path = "entries.db"       # Local checksum file (checksum|name|version|method)
use_remote_db = false                # Download the checksum file instead of reading it
remote_db_url = "https://raw.githubusercontent.com/schmalle/netweather/main/entries.db"

# ===============================================================================
# STORAGE BACKEND
# ===============================================================================
[storage]
backend = "memory"                   # Storage backend: "memory" or "jsonl"
path = "results.jsonl"               # Output file for the jsonl backend
"#;
