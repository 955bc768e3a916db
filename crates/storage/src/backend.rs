use crate::StorageError;
use netweather_models::{LibraryInfo, ScanResult, ScanStatistics, UrlReachability};

/// Persistence for scan output and previously identified checksums
#[async_trait::async_trait]
pub trait ResultStore: Send + Sync {
    /// Persist one fingerprinted script
    async fn store_scan_result(&self, result: &ScanResult) -> Result<(), StorageError>;

    /// Persist the reachability record of one URL
    async fn store_reachability(&self, record: &UrlReachability) -> Result<(), StorageError>;

    /// Library previously stored for `checksum`, ignoring unidentified records
    async fn lookup_by_checksum(&self, checksum: &str) -> Result<Option<LibraryInfo>, StorageError>;

    /// Totals, library usage and the `recent_limit` most recently scanned pages
    async fn statistics(&self, recent_limit: usize) -> Result<ScanStatistics, StorageError>;

    /// Backend name for display
    fn name(&self) -> &'static str;
}
