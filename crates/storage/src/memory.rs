use crate::backend::ResultStore;
use crate::index::ChecksumIndex;
use crate::stats::summarize;
use crate::StorageError;
use netweather_models::{LibraryInfo, ScanResult, ScanStatistics, UrlReachability};
use parking_lot::Mutex;

/// In-process store, contents are lost on exit
#[derive(Default)]
pub struct MemoryStore {
    index: ChecksumIndex,
    scan_results: Mutex<Vec<ScanResult>>,
    reachability: Mutex<Vec<UrlReachability>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scan_results(&self) -> Vec<ScanResult> {
        self.scan_results.lock().clone()
    }

    pub fn reachability_records(&self) -> Vec<UrlReachability> {
        self.reachability.lock().clone()
    }

    /// Number of distinct identified checksums
    pub fn known_checksums(&self) -> usize {
        self.index.len()
    }
}

#[async_trait::async_trait]
impl ResultStore for MemoryStore {
    async fn store_scan_result(&self, result: &ScanResult) -> Result<(), StorageError> {
        self.index.record(result);
        self.scan_results.lock().push(result.clone());
        Ok(())
    }

    async fn store_reachability(&self, record: &UrlReachability) -> Result<(), StorageError> {
        self.reachability.lock().push(record.clone());
        Ok(())
    }

    async fn lookup_by_checksum(&self, checksum: &str) -> Result<Option<LibraryInfo>, StorageError> {
        Ok(self.index.get(checksum))
    }

    async fn statistics(&self, recent_limit: usize) -> Result<ScanStatistics, StorageError> {
        let scans = self.scan_results();
        let reachability = self.reachability_records();
        Ok(summarize(&scans, &reachability, recent_limit))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
