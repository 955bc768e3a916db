use crate::exclusion::ExclusionPolicy;
use crate::progress::ProgressTracker;
use netweather_identifier::LibraryIdentifier;
use netweather_models::{ScanResult, UrlJob, UrlResult};
use netweather_scanner::{Fingerprinter, HttpFetch, ReachabilityChecker, ScriptExtractor};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Per-URL work: exclusion, reachability, then script identification
pub struct UrlPipeline {
    exclusion: ExclusionPolicy,
    checker: ReachabilityChecker,
    extractor: ScriptExtractor,
    fingerprinter: Fingerprinter,
    identifier: Arc<LibraryIdentifier>,
}

impl UrlPipeline {
    pub fn new(
        fetcher: Arc<dyn HttpFetch>,
        identifier: Arc<LibraryIdentifier>,
        exclusion: ExclusionPolicy,
        reachability_timeout: Duration,
    ) -> Self {
        Self {
            exclusion,
            checker: ReachabilityChecker::with_timeout(Arc::clone(&fetcher), reachability_timeout),
            extractor: ScriptExtractor::new(Arc::clone(&fetcher)),
            fingerprinter: Fingerprinter::new(fetcher),
            identifier,
        }
    }

    /// Runs one job to its terminal state, updating the tracker on the way
    pub async fn process(&self, job: UrlJob, tracker: &ProgressTracker) -> UrlResult {
        let started = Instant::now();
        tracker.increment_processed();

        let mut result = UrlResult::new(job);
        let url = result.job.url.clone();

        if self.exclusion.is_excluded(&url) {
            tracing::info!("Skipping excluded URL: {}", url);
            result.excluded = true;
            tracker.increment_excluded();
            result.process_time = started.elapsed();
            return result;
        }

        match self.checker.check(&url).await {
            Err(e) => {
                tracing::warn!("Reachability check failed for {}: {}", url, e);
                result.error = Some(e.to_string());
                tracker.increment_errored();
            }
            Ok(reachability) if !reachability.is_reachable() => {
                tracing::info!("URL not reachable: {}", url);
                result.reachability = Some(reachability);
                tracker.increment_errored();
            }
            Ok(reachability) if !reachability.has_successful_response() => {
                tracing::info!("No HTTP 200 response from {}, skipping scan", url);
                result.reachability = Some(reachability);
                result.skipped = true;
                tracker.increment_skipped();
            }
            Ok(reachability) => {
                tracker.increment_scanned();
                let page_url = reachability.final_url.clone().unwrap_or_else(|| url.clone());
                result.reachability = Some(reachability);
                result.scan_results = self.scan_page(&page_url).await;
            }
        }

        result.process_time = started.elapsed();
        result
    }

    async fn scan_page(&self, page_url: &str) -> Vec<ScanResult> {
        let scripts = self.extractor.extract(page_url).await;
        let mut results = Vec::with_capacity(scripts.len());

        for script_url in scripts {
            let fingerprint = match self.fingerprinter.fingerprint(&script_url).await {
                Ok(fingerprint) => fingerprint,
                Err(e) => {
                    tracing::warn!("Failed to fingerprint {}: {}", script_url, e);
                    continue;
                }
            };

            let info = self.identifier.identify(&fingerprint).await;
            results.push(ScanResult::from_library(page_url, &script_url, info));
        }

        tracing::info!("Scanned {}: {} script(s)", page_url, results.len());
        results
    }
}
