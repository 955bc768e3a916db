use super::IdentificationStrategy;
use crate::cache::ChecksumCache;
use crate::sources::ChecksumSource;
use netweather_models::{LibraryInfo, ScriptFingerprint};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Queries every checksum source concurrently; the first answer wins.
///
/// Each checksum is looked up once: the outcome, a miss or a deadline
/// expiry included, is kept in the shared cache.
pub struct ChecksumLookupStrategy {
    cache: Arc<ChecksumCache>,
    sources: Vec<Arc<dyn ChecksumSource>>,
    deadline: Duration,
}

impl ChecksumLookupStrategy {
    pub fn new(
        cache: Arc<ChecksumCache>,
        sources: Vec<Arc<dyn ChecksumSource>>,
        deadline: Duration,
    ) -> Self {
        Self {
            cache,
            sources,
            deadline,
        }
    }

    async fn first_answer(&self, checksum: &str) -> Option<LibraryInfo> {
        let mut tasks = JoinSet::new();
        for source in &self.sources {
            let source = Arc::clone(source);
            let checksum = checksum.to_string();
            tasks.spawn(async move {
                let found = source.lookup(&checksum).await;
                (source.name(), found)
            });
        }

        let outcome = tokio::time::timeout(self.deadline, async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((source, Some(info))) => {
                        tracing::debug!("{} identified {} via {}", checksum, info.name, source);
                        return Some(info);
                    }
                    Ok((source, None)) => {
                        tracing::debug!("{} unknown to {}", checksum, source);
                    }
                    Err(e) => {
                        tracing::warn!("Checksum source task failed: {}", e);
                    }
                }
            }
            None
        })
        .await;

        tasks.abort_all();

        match outcome {
            Ok(found) => found,
            Err(_) => {
                tracing::debug!("Checksum lookup for {} timed out after {:?}", checksum, self.deadline);
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl IdentificationStrategy for ChecksumLookupStrategy {
    fn name(&self) -> &'static str {
        "checksum-lookup"
    }

    async fn identify(&self, script: &ScriptFingerprint) -> Option<LibraryInfo> {
        if self.sources.is_empty() {
            return self.cache.get(&script.checksum);
        }

        // Callers racing on one checksum share the first lookup, misses included
        let checksum = &script.checksum;
        let slot = self.cache.slot(checksum);
        let outcome = slot
            .get_or_init(|| async move {
                self.first_answer(checksum)
                    .await
                    .map(|info| info.with_checksum(checksum.clone()))
            })
            .await
            .clone();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netweather_models::IdentificationMethod;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticSource {
        delay: Duration,
        answer: Option<LibraryInfo>,
        calls: AtomicUsize,
    }

    impl StaticSource {
        fn new(delay_ms: u64, answer: Option<(&str, IdentificationMethod)>) -> Arc<Self> {
            Arc::new(Self {
                delay: Duration::from_millis(delay_ms),
                answer: answer.map(|(name, method)| LibraryInfo::new(name, "1.0.0", method)),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl ChecksumSource for StaticSource {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn lookup(&self, _checksum: &str) -> Option<LibraryInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.answer.clone()
        }
    }

    fn script() -> ScriptFingerprint {
        ScriptFingerprint {
            url: "https://site.test/a.js".to_string(),
            checksum: "9".repeat(64),
            content: String::new(),
        }
    }

    #[tokio::test]
    async fn test_fastest_answer_wins_and_is_cached() {
        let slow = StaticSource::new(300, Some(("slow", IdentificationMethod::PublicdataApi)));
        let fast = StaticSource::new(10, Some(("fast", IdentificationMethod::FileDb)));
        let cache = Arc::new(ChecksumCache::new());
        let strategy = ChecksumLookupStrategy::new(
            Arc::clone(&cache),
            vec![slow.clone() as Arc<dyn ChecksumSource>, fast.clone()],
            Duration::from_secs(5),
        );

        let info = strategy.identify(&script()).await.unwrap();
        assert_eq!(info.name, "fast");
        assert_eq!(info.method, IdentificationMethod::FileDb);
        assert_eq!(info.checksum, "9".repeat(64));

        let again = strategy.identify(&script()).await.unwrap();
        assert_eq!(again, info);
        assert_eq!(fast.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_answers_fall_through() {
        let a = StaticSource::new(5, None);
        let b = StaticSource::new(5, None);
        let strategy = ChecksumLookupStrategy::new(
            Arc::new(ChecksumCache::new()),
            vec![a as Arc<dyn ChecksumSource>, b],
            Duration::from_secs(5),
        );
        assert!(strategy.identify(&script()).await.is_none());
    }

    #[tokio::test]
    async fn test_deadline_bounds_lookup() {
        let stuck = StaticSource::new(10_000, Some(("late", IdentificationMethod::PublicdataApi)));
        let cache = Arc::new(ChecksumCache::new());
        let strategy = ChecksumLookupStrategy::new(
            Arc::clone(&cache),
            vec![stuck.clone() as Arc<dyn ChecksumSource>],
            Duration::from_millis(50),
        );

        let started = std::time::Instant::now();
        assert!(strategy.identify(&script()).await.is_none());
        assert!(strategy.identify(&script()).await.is_none());
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(stuck.calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_empty());
        assert!(cache.is_resolved(&"9".repeat(64)));
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_lookup() {
        let source = StaticSource::new(100, Some(("shared", IdentificationMethod::PublicdataApi)));
        let strategy = ChecksumLookupStrategy::new(
            Arc::new(ChecksumCache::new()),
            vec![source.clone() as Arc<dyn ChecksumSource>],
            Duration::from_secs(5),
        );

        let script = script();
        let (a, b, c) = tokio::join!(
            strategy.identify(&script),
            strategy.identify(&script),
            strategy.identify(&script)
        );

        assert_eq!(a.as_ref().map(|i| i.name.as_str()), Some("shared"));
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_misses_are_remembered() {
        let source = StaticSource::new(5, None);
        let strategy = ChecksumLookupStrategy::new(
            Arc::new(ChecksumCache::new()),
            vec![source.clone() as Arc<dyn ChecksumSource>],
            Duration::from_secs(5),
        );

        assert!(strategy.identify(&script()).await.is_none());
        assert!(strategy.identify(&script()).await.is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
