use crate::api::PublicDataClient;
use crate::cache::ChecksumCache;
use crate::file_db::FileChecksumDb;
use crate::sources::{ChecksumSource, LocalChecksumSource, PublicDataSource, StoreChecksumSource};
use crate::strategies::{
    ChecksumLookupStrategy, CodeAnalysisStrategy, FallbackStrategy, IdentificationStrategy,
    UrlPatternStrategy,
};
use crate::IdentifierError;
use netweather_config::IdentifierSettings;
use netweather_models::{LibraryInfo, ScriptFingerprint};
use netweather_storage::ResultStore;
use std::sync::Arc;

/// Runs the identification chain over a fingerprinted script.
///
/// Order: CDN URL pattern, code analysis, concurrent checksum lookup, then
/// a fallback that always answers.
pub struct LibraryIdentifier {
    strategies: Vec<Box<dyn IdentificationStrategy>>,
    fallback: FallbackStrategy,
    cache: Arc<ChecksumCache>,
    file_db: Arc<FileChecksumDb>,
}

impl LibraryIdentifier {
    pub fn new(
        settings: &IdentifierSettings,
        store: Option<Arc<dyn ResultStore>>,
    ) -> Result<Self, IdentifierError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("netweather/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Arc::new(ChecksumCache::new());
        let file_db = Arc::new(FileChecksumDb::from_settings(settings, client.clone()));

        let mut sources: Vec<Arc<dyn ChecksumSource>> = Vec::new();
        if settings.api_enabled {
            let api = PublicDataClient::new(client, &settings.api_base_url, settings.api_timeout());
            sources.push(Arc::new(PublicDataSource::new(api)));
        }
        sources.push(Arc::new(LocalChecksumSource::new(Arc::clone(&file_db))));
        if let Some(store) = store {
            sources.push(Arc::new(StoreChecksumSource::new(store)));
        }

        let strategies: Vec<Box<dyn IdentificationStrategy>> = vec![
            Box::new(UrlPatternStrategy),
            Box::new(CodeAnalysisStrategy),
            Box::new(ChecksumLookupStrategy::new(
                Arc::clone(&cache),
                sources,
                settings.lookup_timeout(),
            )),
        ];

        Ok(Self {
            strategies,
            fallback: FallbackStrategy,
            cache,
            file_db,
        })
    }

    /// Never fails: unrecognised scripts get the fallback answer
    pub async fn identify(&self, script: &ScriptFingerprint) -> LibraryInfo {
        for strategy in &self.strategies {
            if let Some(info) = strategy.identify(script).await {
                tracing::debug!(
                    "{} identified as {} {} by {}",
                    script.url,
                    info.name,
                    info.version,
                    strategy.name()
                );
                return info.with_checksum(script.checksum.clone());
            }
        }

        self.fallback.identify(script)
    }

    pub fn cache(&self) -> &ChecksumCache {
        &self.cache
    }

    pub fn file_db(&self) -> &FileChecksumDb {
        &self.file_db
    }
}
