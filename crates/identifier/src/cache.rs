use netweather_models::LibraryInfo;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Outcome of one checksum lookup; `None` once the sources had no answer
pub type LookupSlot = Arc<OnceCell<Option<LibraryInfo>>>;

/// Checksum → lookup outcome, filled by the lookup strategy.
///
/// Each checksum owns one slot: concurrent callers await the same
/// initialization and unidentified checksums are remembered too.
/// Entries are never evicted.
pub struct ChecksumCache {
    entries: RwLock<HashMap<String, LookupSlot>>,
}

impl ChecksumCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Slot for `checksum`, created empty on first use
    pub fn slot(&self, checksum: &str) -> LookupSlot {
        if let Some(slot) = self.entries.read().get(checksum) {
            return Arc::clone(slot);
        }
        Arc::clone(self.entries.write().entry(checksum.to_string()).or_default())
    }

    /// Library resolved for `checksum`, if the lookup identified one
    pub fn get(&self, checksum: &str) -> Option<LibraryInfo> {
        self.entries
            .read()
            .get(checksum)
            .and_then(|slot| slot.get().cloned().flatten())
    }

    pub fn insert(&self, checksum: String, info: LibraryInfo) {
        let slot = Arc::new(OnceCell::new_with(Some(Some(info))));
        self.entries.write().insert(checksum, slot);
    }

    /// True once a lookup for `checksum` has finished, identified or not
    pub fn is_resolved(&self, checksum: &str) -> bool {
        self.entries
            .read()
            .get(checksum)
            .is_some_and(|slot| slot.initialized())
    }

    /// Number of identified checksums
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .values()
            .filter(|slot| matches!(slot.get(), Some(Some(_))))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ChecksumCache {
    fn default() -> Self {
        Self::new()
    }
}
