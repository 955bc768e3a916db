use crate::api::PublicDataClient;
use crate::file_db::FileChecksumDb;
use crate::known::lookup_known;
use netweather_models::{IdentificationMethod, LibraryInfo};
use netweather_storage::ResultStore;
use std::sync::Arc;

/// One backend queried concurrently by the checksum lookup
#[async_trait::async_trait]
pub trait ChecksumSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn lookup(&self, checksum: &str) -> Option<LibraryInfo>;
}

pub struct PublicDataSource {
    client: PublicDataClient,
}

impl PublicDataSource {
    pub fn new(client: PublicDataClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ChecksumSource for PublicDataSource {
    fn name(&self) -> &'static str {
        "publicdata-api"
    }

    async fn lookup(&self, checksum: &str) -> Option<LibraryInfo> {
        match self.client.lookup(checksum).await {
            Ok(info) => info,
            Err(e) => {
                tracing::debug!("Checksum API lookup failed: {}", e);
                None
            }
        }
    }
}

/// Built-in checksum table, then the checksum database file
pub struct LocalChecksumSource {
    file_db: Arc<FileChecksumDb>,
}

impl LocalChecksumSource {
    pub fn new(file_db: Arc<FileChecksumDb>) -> Self {
        Self { file_db }
    }
}

#[async_trait::async_trait]
impl ChecksumSource for LocalChecksumSource {
    fn name(&self) -> &'static str {
        "local-checksums"
    }

    async fn lookup(&self, checksum: &str) -> Option<LibraryInfo> {
        if let Some(info) = lookup_known(checksum) {
            return Some(info);
        }
        self.file_db.lookup(checksum).await
    }
}

/// Libraries identified in earlier runs
pub struct StoreChecksumSource {
    store: Arc<dyn ResultStore>,
}

impl StoreChecksumSource {
    pub fn new(store: Arc<dyn ResultStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl ChecksumSource for StoreChecksumSource {
    fn name(&self) -> &'static str {
        "local-db"
    }

    async fn lookup(&self, checksum: &str) -> Option<LibraryInfo> {
        match self.store.lookup_by_checksum(checksum).await {
            Ok(info) => info.map(|mut info| {
                info.method = IdentificationMethod::LocalDb;
                info
            }),
            Err(e) => {
                tracing::warn!("Stored result lookup failed: {}", e);
                None
            }
        }
    }
}
