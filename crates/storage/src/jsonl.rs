use crate::backend::ResultStore;
use crate::index::ChecksumIndex;
use crate::stats::summarize;
use crate::StorageError;
use netweather_models::{LibraryInfo, ScanResult, ScanStatistics, UrlReachability};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
enum StoredRecord {
    Reachability(UrlReachability),
    ScanResult(ScanResult),
}

/// Append-only JSON-lines file, one tagged record per line
pub struct JsonLinesStore {
    path: PathBuf,
    file: Mutex<File>,
    index: ChecksumIndex,
}

impl JsonLinesStore {
    /// Opens (or creates) the file and rebuilds the checksum index from it
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let index = ChecksumIndex::default();

        let mut restored = 0usize;
        for record in read_records(&path).await? {
            if let StoredRecord::ScanResult(result) = record {
                index.record(&result);
                restored += 1;
            }
        }
        tracing::debug!("Restored {} scan result(s) from {}", restored, path.display());

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        Ok(Self {
            path,
            file: Mutex::new(file),
            index,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, record: &StoredRecord) -> Result<(), StorageError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Every well-formed record of the file; malformed lines are skipped with a warning
async fn read_records(path: &Path) -> Result<Vec<StoredRecord>, StorageError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let mut records = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<StoredRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(
                    "Skipping malformed record at {}:{}: {}",
                    path.display(),
                    line_no + 1,
                    e
                );
            }
        }
    }
    Ok(records)
}

#[async_trait::async_trait]
impl ResultStore for JsonLinesStore {
    async fn store_scan_result(&self, result: &ScanResult) -> Result<(), StorageError> {
        self.append(&StoredRecord::ScanResult(result.clone())).await?;
        self.index.record(result);
        Ok(())
    }

    async fn store_reachability(&self, record: &UrlReachability) -> Result<(), StorageError> {
        self.append(&StoredRecord::Reachability(record.clone())).await
    }

    async fn lookup_by_checksum(&self, checksum: &str) -> Result<Option<LibraryInfo>, StorageError> {
        Ok(self.index.get(checksum))
    }

    async fn statistics(&self, recent_limit: usize) -> Result<ScanStatistics, StorageError> {
        // Keeps writers out so no line is read half-written
        let _writer = self.file.lock().await;

        let mut scans = Vec::new();
        let mut reachability = Vec::new();
        for record in read_records(&self.path).await? {
            match record {
                StoredRecord::ScanResult(result) => scans.push(result),
                StoredRecord::Reachability(record) => reachability.push(record),
            }
        }
        Ok(summarize(&scans, &reachability, recent_limit))
    }

    fn name(&self) -> &'static str {
        "jsonl"
    }
}
