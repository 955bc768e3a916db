use bytes::Bytes;
use netweather_config::IdentifierSettings;
use netweather_events::EventBus;
use netweather_identifier::LibraryIdentifier;
use netweather_models::IdentificationMethod;
use netweather_processor::{ParallelProcessor, ProcessError, ProcessorConfig};
use netweather_scanner::{FetchedResponse, HttpFetch, ProbeResponse, ScanError};
use netweather_storage::{MemoryStore, ResultStore};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
enum Reply {
    Page {
        status: u16,
        content_type: &'static str,
        body: &'static str,
    },
    /// Never answers before the probe timeout
    Hang,
}

fn page(status: u16, body: &'static str) -> Reply {
    Reply::Page {
        status,
        content_type: "text/html",
        body,
    }
}

/// In-memory transport answering from a URL table
struct ScriptedFetcher {
    replies: HashMap<String, Reply>,
    probe_delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedFetcher {
    fn new(replies: Vec<(&str, Reply)>, probe_delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            replies: replies
                .into_iter()
                .map(|(url, reply)| (url.to_string(), reply))
                .collect(),
            probe_delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl HttpFetch for ScriptedFetcher {
    async fn probe(&self, url: &str, timeout: Duration) -> Result<ProbeResponse, ScanError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let outcome = match self.replies.get(url) {
            Some(Reply::Page { status, .. }) => {
                tokio::time::sleep(self.probe_delay).await;
                Ok(ProbeResponse {
                    status: *status,
                    final_url: url.to_string(),
                })
            }
            Some(Reply::Hang) => {
                tokio::time::sleep(timeout).await;
                Err(ScanError::Http("operation timed out".to_string()))
            }
            None => Err(ScanError::Http("connection refused".to_string())),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    async fn fetch(&self, url: &str) -> Result<FetchedResponse, ScanError> {
        match self.replies.get(url) {
            Some(Reply::Page {
                status,
                content_type,
                body,
            }) => Ok(FetchedResponse {
                status: *status,
                final_url: url.to_string(),
                content_type: Some(content_type.to_string()),
                body: Bytes::from_static(body.as_bytes()),
            }),
            _ => Err(ScanError::Http("connection refused".to_string())),
        }
    }
}

fn identifier(dir: &TempDir) -> Arc<LibraryIdentifier> {
    let settings = IdentifierSettings {
        api_enabled: false,
        entries_db_path: dir.path().join("entries.db").display().to_string(),
        ..IdentifierSettings::default()
    };
    Arc::new(LibraryIdentifier::new(&settings, None).unwrap())
}

fn config(max_workers: usize, reachability_timeout: Duration) -> ProcessorConfig {
    ProcessorConfig {
        max_workers,
        reachability_timeout,
        ..ProcessorConfig::default()
    }
}

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|u| u.to_string()).collect()
}

fn scenario_fetcher() -> Arc<ScriptedFetcher> {
    ScriptedFetcher::new(
        vec![
            (
                "http://ok.test/",
                page(
                    200,
                    r#"<html><script src="/js/app.js"></script><script src="/js/missing.js"></script></html>"#,
                ),
            ),
            (
                "http://ok.test/js/app.js",
                Reply::Page {
                    status: 200,
                    content_type: "application/javascript",
                    body: "console.log('hello world');",
                },
            ),
            ("http://missing.test/", page(404, "not found")),
            ("http://slow.test/", Reply::Hang),
        ],
        Duration::from_millis(5),
    )
}

#[tokio::test]
async fn test_scenario_counts_each_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let processor = ParallelProcessor::new(
        config(2, Duration::from_millis(100)),
        scenario_fetcher(),
        identifier(&dir),
        EventBus::new(false),
    );

    let report = processor
        .process_urls(
            CancellationToken::new(),
            urls(&["http://ok.test/", "http://missing.test/", "http://slow.test/"]),
        )
        .await
        .unwrap();

    let progress = report.progress;
    assert_eq!(progress.total, 3);
    assert_eq!(progress.processed, 3);
    assert_eq!(progress.scanned, 1);
    assert_eq!(progress.skipped, 1);
    assert_eq!(progress.errored, 1);
    assert_eq!(progress.excluded, 0);
    assert_eq!(report.results.len(), 3);
    assert_eq!(processor.progress(), progress);

    let scanned = report.results.iter().find(|r| r.is_scanned()).unwrap();
    assert_eq!(scanned.job.url, "http://ok.test/");
    assert_eq!(scanned.scan_results.len(), 1);
    let scan = &scanned.scan_results[0];
    assert_eq!(scan.script_url, "http://ok.test/js/app.js");
    assert_eq!(scan.library_name, "app");
    assert_eq!(scan.library_version, "unknown");
    assert_eq!(scan.identified_by, IdentificationMethod::Unknown);
    assert_eq!(report.methods.get(&IdentificationMethod::Unknown), Some(&1));

    let skipped = report.results.iter().find(|r| r.skipped).unwrap();
    assert_eq!(skipped.job.url, "http://missing.test/");
    assert!(skipped.scan_results.is_empty());
}

#[tokio::test]
async fn test_every_job_reaches_one_terminal_state() {
    let dir = tempfile::tempdir().unwrap();
    let processor = ParallelProcessor::new(
        config(3, Duration::from_millis(100)),
        scenario_fetcher(),
        identifier(&dir),
        EventBus::new(false),
    );

    let report = processor
        .process_urls(
            CancellationToken::new(),
            urls(&[
                "http://ok.test/",
                "https://login.live.com/oauth",
                "sub.login.microsoftonline.com",
                "ftp://files.test/",
                "http://missing.test/",
                "http://unknown-host.test/",
            ]),
        )
        .await
        .unwrap();

    let progress = report.progress;
    assert_eq!(progress.processed, 6);
    assert_eq!(progress.terminal(), progress.processed);
    assert_eq!(progress.excluded, 2);
    assert_eq!(progress.scanned, 1);
    assert_eq!(progress.skipped, 1);
    assert_eq!(progress.errored, 2);

    let mut indexes: Vec<usize> = report.results.iter().map(|r| r.job.index).collect();
    indexes.sort_unstable();
    assert_eq!(indexes, vec![0, 1, 2, 3, 4, 5]);

    let invalid = report.results.iter().find(|r| r.job.index == 3).unwrap();
    assert!(invalid.error.as_deref().unwrap().contains("ftp"));
    assert!(invalid.reachability.is_none());
}

#[tokio::test]
async fn test_worker_pool_bounds_concurrency() {
    let dir = tempfile::tempdir().unwrap();
    let targets: Vec<String> = (0..10).map(|i| format!("http://host{}.test/", i)).collect();
    let fetcher = ScriptedFetcher::new(
        targets.iter().map(|u| (u.as_str(), page(404, ""))).collect(),
        Duration::from_millis(30),
    );

    let processor = ParallelProcessor::new(
        config(3, Duration::from_secs(1)),
        fetcher.clone(),
        identifier(&dir),
        EventBus::new(false),
    );

    let report = processor
        .process_urls(CancellationToken::new(), targets)
        .await
        .unwrap();

    assert_eq!(report.progress.processed, 10);
    assert_eq!(report.progress.skipped, 10);
    let peak = fetcher.max_in_flight.load(Ordering::SeqCst);
    assert!(peak >= 1 && peak <= 3, "peak in-flight jobs: {}", peak);
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let dir = tempfile::tempdir().unwrap();
    let processor = ParallelProcessor::new(
        config(2, Duration::from_millis(100)),
        scenario_fetcher(),
        identifier(&dir),
        EventBus::new(false),
    );

    let token = CancellationToken::new();
    token.cancel();

    let err = processor
        .process_urls(token, urls(&["http://ok.test/"]))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessError::Cancelled { collected: 0 }));
    assert_eq!(processor.progress().processed, 0);
}

#[tokio::test]
async fn test_cancellation_stops_run_promptly() {
    let dir = tempfile::tempdir().unwrap();
    let targets: Vec<String> = (0..20).map(|i| format!("http://hang{}.test/", i)).collect();
    let fetcher = ScriptedFetcher::new(
        targets.iter().map(|u| (u.as_str(), Reply::Hang)).collect(),
        Duration::ZERO,
    );

    let processor = ParallelProcessor::new(
        config(4, Duration::from_secs(3600)),
        fetcher,
        identifier(&dir),
        EventBus::new(false),
    );

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let outcome = tokio::time::timeout(Duration::from_secs(5), processor.process_urls(token, targets))
        .await
        .expect("run did not stop after cancellation");

    match outcome {
        Err(ProcessError::Cancelled { collected }) => {
            let progress = processor.progress();
            assert!(collected as u64 <= progress.processed);
            assert!(progress.processed <= 4);
        }
        other => panic!("expected cancellation, got {:?}", other.map(|r| r.progress)),
    }
}

#[tokio::test]
async fn test_collector_persists_when_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let processor = ParallelProcessor::new(
        ProcessorConfig {
            use_db: true,
            ..config(2, Duration::from_millis(100))
        },
        scenario_fetcher(),
        identifier(&dir),
        EventBus::new(true),
    )
    .with_store(store.clone() as Arc<dyn ResultStore>);

    processor
        .process_urls(
            CancellationToken::new(),
            urls(&["http://ok.test/", "http://missing.test/", "login.live.com"]),
        )
        .await
        .unwrap();

    // Excluded URLs have no reachability record
    assert_eq!(store.reachability_records().len(), 2);
    let scans = store.scan_results();
    assert_eq!(scans.len(), 1);
    assert_eq!(scans[0].script_url, "http://ok.test/js/app.js");
}

#[tokio::test]
async fn test_store_untouched_without_use_db() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let processor = ParallelProcessor::new(
        config(2, Duration::from_millis(100)),
        scenario_fetcher(),
        identifier(&dir),
        EventBus::new(false),
    )
    .with_store(store.clone() as Arc<dyn ResultStore>);

    processor
        .process_urls(CancellationToken::new(), urls(&["http://ok.test/"]))
        .await
        .unwrap();

    assert!(store.reachability_records().is_empty());
    assert!(store.scan_results().is_empty());
}

#[tokio::test]
async fn test_verbose_setting_reaches_event_bus() {
    let dir = tempfile::tempdir().unwrap();
    let events = EventBus::new(false);
    let _processor = ParallelProcessor::new(
        ProcessorConfig {
            verbose: true,
            ..config(1, Duration::from_millis(100))
        },
        scenario_fetcher(),
        identifier(&dir),
        Arc::clone(&events),
    );

    assert!(events.is_verbose());
}
