use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const UNKNOWN_VERSION: &str = "unknown";
pub const UNKNOWN_LIBRARY: &str = "unknown";

/// One input URL queued for the worker pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlJob {
    pub url: String,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn scheme(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Http => f.write_str("HTTP"),
            Protocol::Https => f.write_str("HTTPS"),
        }
    }
}

/// Per-protocol availability of a URL.
///
/// A protocol that failed at the transport level is `*_available == false`
/// with no status; an answered request is available whatever its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlReachability {
    pub original_url: String,
    pub http_available: bool,
    pub https_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https_redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
    pub scanned_at: DateTime<Utc>,
}

impl UrlReachability {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            http_available: false,
            https_available: false,
            http_status: None,
            https_status: None,
            http_redirect_url: None,
            https_redirect_url: None,
            final_url: None,
            scanned_at: Utc::now(),
        }
    }

    pub fn http_ok(&self) -> bool {
        self.http_available && self.http_status == Some(200)
    }

    pub fn https_ok(&self) -> bool {
        self.https_available && self.https_status == Some(200)
    }

    /// True if either protocol answered with HTTP 200
    pub fn has_successful_response(&self) -> bool {
        self.http_ok() || self.https_ok()
    }

    pub fn is_reachable(&self) -> bool {
        self.http_available || self.https_available
    }

    /// HTTPS wins when both protocols answered 200
    pub fn best_protocol(&self) -> Option<Protocol> {
        if self.https_ok() {
            Some(Protocol::Https)
        } else if self.http_ok() {
            Some(Protocol::Http)
        } else {
            None
        }
    }

    pub fn has_redirect(&self) -> bool {
        self.http_redirect_url.is_some() || self.https_redirect_url.is_some()
    }
}

/// Which strategy of the identification chain produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentificationMethod {
    UrlPattern,
    CodeAnalysis,
    ContextAnalysis,
    SignatureAnalysis,
    PublicdataApi,
    ChecksumDb,
    FileDb,
    LocalDb,
    Unknown,
}

impl IdentificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentificationMethod::UrlPattern => "url-pattern",
            IdentificationMethod::CodeAnalysis => "code-analysis",
            IdentificationMethod::ContextAnalysis => "context-analysis",
            IdentificationMethod::SignatureAnalysis => "signature-analysis",
            IdentificationMethod::PublicdataApi => "publicdata-api",
            IdentificationMethod::ChecksumDb => "checksum-db",
            IdentificationMethod::FileDb => "file-db",
            IdentificationMethod::LocalDb => "local-db",
            IdentificationMethod::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IdentificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryInfo {
    pub name: String,
    pub version: String,
    pub checksum: String,
    pub method: IdentificationMethod,
}

impl LibraryInfo {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        method: IdentificationMethod,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            checksum: String::new(),
            method,
        }
    }

    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = checksum.into();
        self
    }
}

/// Downloaded script: content-addressed by its SHA-256 checksum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFingerprint {
    pub url: String,
    pub checksum: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub base_url: String,
    pub script_url: String,
    pub checksum: String,
    pub library_name: String,
    pub library_version: String,
    pub identified_by: IdentificationMethod,
    pub scanned_at: DateTime<Utc>,
}

impl ScanResult {
    pub fn from_library(base_url: &str, script_url: &str, info: LibraryInfo) -> Self {
        Self {
            base_url: base_url.to_string(),
            script_url: script_url.to_string(),
            checksum: info.checksum,
            library_name: info.name,
            library_version: info.version,
            identified_by: info.method,
            scanned_at: Utc::now(),
        }
    }

    /// First eight checksum characters, for display
    pub fn short_checksum(&self) -> &str {
        self.checksum.get(..8).unwrap_or(&self.checksum)
    }
}

/// Terminal outcome of one job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlResult {
    pub job: UrlJob,
    pub reachability: Option<UrlReachability>,
    pub scan_results: Vec<ScanResult>,
    pub error: Option<String>,
    pub excluded: bool,
    pub skipped: bool,
    pub process_time: Duration,
}

impl UrlResult {
    pub fn new(job: UrlJob) -> Self {
        Self {
            job,
            reachability: None,
            scan_results: Vec::new(),
            error: None,
            excluded: false,
            skipped: false,
            process_time: Duration::ZERO,
        }
    }

    /// Reachability failed outright, or neither protocol answered
    pub fn is_errored(&self) -> bool {
        self.error.is_some()
            || self
                .reachability
                .as_ref()
                .map_or(false, |r| !r.is_reachable())
    }

    pub fn is_scanned(&self) -> bool {
        !self.excluded && !self.skipped && !self.is_errored()
    }

    /// URL that was actually scanned (after redirects)
    pub fn scanned_url(&self) -> &str {
        self.reachability
            .as_ref()
            .and_then(|r| r.final_url.as_deref())
            .unwrap_or(&self.job.url)
    }
}

/// Point-in-time view of the progress counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub total: u64,
    pub processed: u64,
    pub scanned: u64,
    pub excluded: u64,
    pub skipped: u64,
    pub errored: u64,
}

impl ProgressSnapshot {
    /// Jobs that reached one of the terminal buckets
    pub fn terminal(&self) -> u64 {
        self.scanned + self.excluded + self.skipped + self.errored
    }

    pub fn is_complete(&self) -> bool {
        self.processed == self.total
    }
}

/// Library occurrences grouped by name, version and checksum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryUsage {
    pub name: String,
    pub version: String,
    pub checksum: String,
    pub count: usize,
    pub identified_by: IdentificationMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentScan {
    pub url: String,
    pub scanned_at: DateTime<Utc>,
}

/// Protocol availability over the latest record of each checked URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReachabilityStatistics {
    pub total_checked: usize,
    pub http_only: usize,
    pub https_only: usize,
    pub both_protocols: usize,
    pub unreachable: usize,
    pub with_redirects: usize,
}

/// Aggregate view over everything a result store holds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStatistics {
    pub total_urls: usize,
    pub total_scripts: usize,
    pub unique_libraries: usize,
    pub first_scan: Option<DateTime<Utc>>,
    pub last_scan: Option<DateTime<Utc>>,
    pub libraries: Vec<LibraryUsage>,
    pub recent_scans: Vec<RecentScan>,
    pub reachability: ReachabilityStatistics,
}
