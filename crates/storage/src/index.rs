use dashmap::DashMap;
use netweather_models::{IdentificationMethod, LibraryInfo, ScanResult, UNKNOWN_LIBRARY};

/// Checksum → library index shared by the store implementations
#[derive(Default)]
pub(crate) struct ChecksumIndex {
    entries: DashMap<String, LibraryInfo>,
}

impl ChecksumIndex {
    /// Records the library of `result` unless it was never identified
    pub fn record(&self, result: &ScanResult) {
        if result.library_name.is_empty() || result.library_name == UNKNOWN_LIBRARY {
            return;
        }

        let info = LibraryInfo::new(
            result.library_name.clone(),
            result.library_version.clone(),
            IdentificationMethod::LocalDb,
        )
        .with_checksum(result.checksum.to_lowercase());

        self.entries.insert(result.checksum.to_lowercase(), info);
    }

    pub fn get(&self, checksum: &str) -> Option<LibraryInfo> {
        self.entries
            .get(&checksum.to_lowercase())
            .map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
