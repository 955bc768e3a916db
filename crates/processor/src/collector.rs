use crate::progress::ProgressTracker;
use netweather_events::{AppEvent, EventBus};
use netweather_models::{IdentificationMethod, UrlResult};
use netweather_storage::ResultStore;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Everything the collector gathered over a run
#[derive(Debug, Default)]
pub(crate) struct Collected {
    pub results: Vec<UrlResult>,
    pub methods: BTreeMap<IdentificationMethod, usize>,
}

/// Single consumer of worker results: persistence, statistics and output
pub(crate) struct Collector {
    pub store: Option<Arc<dyn ResultStore>>,
    pub events: Arc<EventBus>,
    pub tracker: Arc<ProgressTracker>,
}

impl Collector {
    /// Drains `results` until every worker has dropped its sender
    pub async fn run(self, mut results: mpsc::Receiver<UrlResult>) -> Collected {
        let mut collected = Collected::default();

        while let Some(result) = results.recv().await {
            if let Some(store) = &self.store {
                persist(store.as_ref(), &result).await;
            }

            for scan in &result.scan_results {
                *collected.methods.entry(scan.identified_by).or_insert(0) += 1;
            }

            self.events.emit(AppEvent::UrlProcessed {
                result: Box::new(result.clone()),
                progress: self.tracker.snapshot(),
            });
            collected.results.push(result);
        }

        collected
    }
}

async fn persist(store: &dyn ResultStore, result: &UrlResult) {
    if let Some(reachability) = &result.reachability {
        if let Err(e) = store.store_reachability(reachability).await {
            tracing::warn!("Failed to store reachability for {}: {}", result.job.url, e);
        }
    }

    for scan in &result.scan_results {
        if let Err(e) = store.store_scan_result(scan).await {
            tracing::warn!("Failed to store scan result for {}: {}", scan.script_url, e);
        }
    }
}
