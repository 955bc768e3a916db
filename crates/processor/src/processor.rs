use crate::collector::Collector;
use crate::config::ProcessorConfig;
use crate::exclusion::ExclusionPolicy;
use crate::pipeline::UrlPipeline;
use crate::progress::ProgressTracker;
use crate::ProcessError;
use netweather_events::{AppEvent, EventBus};
use netweather_identifier::LibraryIdentifier;
use netweather_models::{IdentificationMethod, ProgressSnapshot, UrlJob, UrlResult};
use netweather_scanner::HttpFetch;
use netweather_storage::ResultStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub progress: ProgressSnapshot,
    pub results: Vec<UrlResult>,
    pub methods: BTreeMap<IdentificationMethod, usize>,
}

/// Bounded worker pool over a URL list with a single result collector
pub struct ParallelProcessor {
    config: ProcessorConfig,
    pipeline: Arc<UrlPipeline>,
    store: Option<Arc<dyn ResultStore>>,
    events: Arc<EventBus>,
    tracker: RwLock<Arc<ProgressTracker>>,
}

impl ParallelProcessor {
    pub fn new(
        config: ProcessorConfig,
        fetcher: Arc<dyn HttpFetch>,
        identifier: Arc<LibraryIdentifier>,
        events: Arc<EventBus>,
    ) -> Self {
        let pipeline = UrlPipeline::new(
            fetcher,
            identifier,
            ExclusionPolicy::new(&config.exclude_domains),
            config.reachability_timeout,
        );
        events.set_verbose(config.verbose);

        Self {
            config,
            pipeline: Arc::new(pipeline),
            store: None,
            events,
            tracker: RwLock::new(Arc::new(ProgressTracker::default())),
        }
    }

    /// Store written by the collector when `use_db` is set
    pub fn with_store(mut self, store: Arc<dyn ResultStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Counters of the current (or last) run
    pub fn progress(&self) -> ProgressSnapshot {
        self.tracker.read().snapshot()
    }

    pub async fn process_urls(
        &self,
        token: CancellationToken,
        urls: Vec<String>,
    ) -> Result<RunReport, ProcessError> {
        let total = urls.len();
        let tracker = Arc::new(ProgressTracker::new(total as u64));
        *self.tracker.write() = Arc::clone(&tracker);

        if token.is_cancelled() {
            self.events.emit(AppEvent::RunCancelled {
                progress: tracker.snapshot(),
            });
            return Err(ProcessError::Cancelled { collected: 0 });
        }

        let workers = self.config.worker_count(total);
        tracing::info!("Processing {} URL(s) with {} worker(s)", total, workers);
        self.events.emit(AppEvent::RunStarted { total, workers });

        let (job_tx, job_rx) = mpsc::channel::<UrlJob>(total.max(1));
        let job_rx = Arc::new(Mutex::new(job_rx));
        let (result_tx, result_rx) = mpsc::channel::<UrlResult>(workers * 2);

        let collector = Collector {
            store: if self.config.use_db { self.store.clone() } else { None },
            events: Arc::clone(&self.events),
            tracker: Arc::clone(&tracker),
        };
        let collector = tokio::spawn(collector.run(result_rx));

        let mut pool = JoinSet::new();
        for worker_id in 0..workers {
            pool.spawn(worker_loop(
                worker_id,
                Arc::clone(&job_rx),
                result_tx.clone(),
                Arc::clone(&self.pipeline),
                Arc::clone(&tracker),
                token.clone(),
                self.config.request_delay,
            ));
        }
        drop(result_tx);

        for (index, url) in urls.into_iter().enumerate() {
            if token.is_cancelled() {
                break;
            }
            if job_tx.send(UrlJob { url, index }).await.is_err() {
                break;
            }
        }
        drop(job_tx);

        while let Some(joined) = pool.join_next().await {
            joined?;
        }
        let collected = collector.await?;
        let progress = tracker.snapshot();

        if token.is_cancelled() {
            tracing::info!(
                "Run cancelled after {}/{} URL(s)",
                progress.processed,
                progress.total
            );
            self.events.emit(AppEvent::RunCancelled { progress });
            return Err(ProcessError::Cancelled {
                collected: collected.results.len(),
            });
        }

        tracing::info!(
            "Run finished: {} scanned, {} excluded, {} skipped, {} errored",
            progress.scanned,
            progress.excluded,
            progress.skipped,
            progress.errored
        );
        self.events.emit(AppEvent::RunFinished {
            progress,
            methods: collected.methods.iter().map(|(m, n)| (*m, *n)).collect(),
        });

        Ok(RunReport {
            progress,
            results: collected.results,
            methods: collected.methods,
        })
    }
}

async fn worker_loop(
    worker_id: usize,
    jobs: Arc<Mutex<mpsc::Receiver<UrlJob>>>,
    results: mpsc::Sender<UrlResult>,
    pipeline: Arc<UrlPipeline>,
    tracker: Arc<ProgressTracker>,
    token: CancellationToken,
    delay: Duration,
) {
    tracing::debug!("Worker {} started", worker_id);

    loop {
        let job = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            job = next_job(&jobs) => match job {
                Some(job) => job,
                None => break,
            },
        };

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            result = pipeline.process(job, &tracker) => result,
        };

        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            sent = results.send(result) => {
                if sent.is_err() {
                    break;
                }
            }
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    tracing::debug!("Worker {} stopped", worker_id);
}

async fn next_job(jobs: &Mutex<mpsc::Receiver<UrlJob>>) -> Option<UrlJob> {
    jobs.lock().await.recv().await
}
