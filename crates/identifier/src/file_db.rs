use crate::IdentifierError;
use netweather_config::IdentifierSettings;
use netweather_models::{IdentificationMethod, LibraryInfo};
use netweather_utils::is_valid_checksum;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Upper bound for fetching the remote database
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

type Loaded = (HashMap<String, LibraryInfo>, &'static str);

struct DbState {
    entries: HashMap<String, LibraryInfo>,
    loaded: bool,
    use_remote: bool,
    pending: Option<JoinHandle<Loaded>>,
}

/// Where entries come from; cloned into the loader task
#[derive(Clone)]
struct DbSource {
    path: PathBuf,
    remote_url: String,
    client: reqwest::Client,
    download_timeout: Duration,
}

/// Checksum database in `checksum|name|version|method` lines, loaded lazily
/// from a local file or downloaded once from a remote URL.
///
/// The load runs in its own task. A caller dropped mid-load (a lookup hitting
/// its deadline) leaves that task running, and the next caller awaits it.
pub struct FileChecksumDb {
    source: DbSource,
    state: RwLock<DbState>,
}

impl FileChecksumDb {
    pub fn new(
        path: impl Into<PathBuf>,
        remote_url: impl Into<String>,
        use_remote: bool,
        client: reqwest::Client,
    ) -> Self {
        Self {
            source: DbSource {
                path: path.into(),
                remote_url: remote_url.into(),
                client,
                download_timeout: DOWNLOAD_TIMEOUT,
            },
            state: RwLock::new(DbState {
                entries: HashMap::new(),
                loaded: false,
                use_remote,
                pending: None,
            }),
        }
    }

    pub fn from_settings(settings: &IdentifierSettings, client: reqwest::Client) -> Self {
        Self::new(
            &settings.entries_db_path,
            &settings.remote_db_url,
            settings.use_remote_db,
            client,
        )
    }

    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.source.download_timeout = timeout;
        self
    }

    /// Switches between remote and local source; the next lookup reloads
    pub async fn set_remote(&self, use_remote: bool) {
        let mut state = self.state.write().await;
        if let Some(loader) = state.pending.take() {
            loader.abort();
        }
        state.use_remote = use_remote;
        state.loaded = false;
        state.entries.clear();
    }

    pub async fn lookup(&self, checksum: &str) -> Option<LibraryInfo> {
        self.ensure_loaded().await;

        let state = self.state.read().await;
        state.entries.get(&checksum.to_ascii_lowercase()).map(|entry| {
            LibraryInfo::new(entry.name.clone(), entry.version.clone(), IdentificationMethod::FileDb)
                .with_checksum(entry.checksum.clone())
        })
    }

    /// Number of loaded entries (loads the database if needed)
    pub async fn len(&self) -> usize {
        self.ensure_loaded().await;
        self.state.read().await.entries.len()
    }

    async fn ensure_loaded(&self) {
        if self.state.read().await.loaded {
            return;
        }

        let mut state = self.state.write().await;
        if state.loaded {
            return;
        }

        let use_remote = state.use_remote;
        let source = self.source.clone();
        let loader = state
            .pending
            .get_or_insert_with(|| tokio::spawn(source.load(use_remote)));
        let joined = loader.await;
        state.pending = None;

        let (entries, origin) = match joined {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!("Loading entries.db failed: {}", e);
                (HashMap::new(), "local")
            }
        };
        state.entries = entries;
        state.loaded = true;

        tracing::info!("Loaded {} entries from {} entries.db", state.entries.len(), origin);
    }
}

impl DbSource {
    async fn load(self, use_remote: bool) -> Loaded {
        let (content, origin) = if use_remote {
            match self.download().await {
                Ok(content) => (Some(content), "remote"),
                Err(e) => {
                    tracing::warn!("Failed to download remote entries.db, falling back to local: {}", e);
                    (self.read_local().await, "local")
                }
            }
        } else {
            (self.read_local().await, "local")
        };

        let entries = match content {
            Some(content) => {
                let (entries, skipped) = parse_entries(&content);
                if skipped > 0 {
                    tracing::warn!("Skipped {} invalid line(s) in entries.db", skipped);
                }
                entries
            }
            None => HashMap::new(),
        };
        (entries, origin)
    }

    async fn download(&self) -> Result<String, IdentifierError> {
        tracing::info!("Downloading remote entries.db from: {}", self.remote_url);

        let response = self
            .client
            .get(&self.remote_url)
            .timeout(self.download_timeout)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(IdentifierError::Http(format!(
                "HTTP {} for {}",
                response.status().as_u16(),
                self.remote_url
            )));
        }

        Ok(response.text().await?)
    }

    async fn read_local(&self) -> Option<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No checksum database at {}", self.path.display());
                None
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

/// Parses database lines, returning the entries and the number of invalid lines
pub fn parse_entries(content: &str) -> (HashMap<String, LibraryInfo>, usize) {
    let mut entries = HashMap::new();
    let mut skipped = 0;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split('|').map(str::trim).collect();
        let [checksum, name, version, _method] = parts.as_slice() else {
            tracing::warn!("Invalid format in entries.db line {}: {}", line_no, line);
            skipped += 1;
            continue;
        };

        if !is_valid_checksum(checksum) {
            tracing::warn!("Invalid checksum format in entries.db line {}: {}", line_no, checksum);
            skipped += 1;
            continue;
        }

        let checksum = checksum.to_ascii_lowercase();
        let info = LibraryInfo::new(*name, *version, IdentificationMethod::FileDb)
            .with_checksum(checksum.clone());
        entries.insert(checksum, info);
    }

    (entries, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entries() {
        let valid = "A".repeat(64);
        let content = format!(
            "# header\n\n{valid}|lodash|4.17.21|manual\nabc|short|1.0|x\n{}|missing|fields\n",
            "b".repeat(64)
        );

        let (entries, skipped) = parse_entries(&content);
        assert_eq!(entries.len(), 1);
        assert_eq!(skipped, 2);

        let info = &entries[&"a".repeat(64)];
        assert_eq!(info.name, "lodash");
        assert_eq!(info.version, "4.17.21");
        assert_eq!(info.checksum, "a".repeat(64));
    }

    #[test]
    fn test_non_hex_checksum_rejected() {
        let (entries, skipped) = parse_entries(&format!("{}|x|1|m", "g".repeat(64)));
        assert!(entries.is_empty());
        assert_eq!(skipped, 1);
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let db = FileChecksumDb::new(
            dir.path().join("entries.db"),
            "http://127.0.0.1:1/entries.db",
            false,
            reqwest::Client::new(),
        );

        assert_eq!(db.len().await, 0);
        assert!(db.lookup(&"a".repeat(64)).await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_from_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.db");
        let checksum = "c".repeat(64);
        tokio::fs::write(&path, format!("{checksum}|chart|4.4.0|manual\n")).await.unwrap();

        let db = FileChecksumDb::new(&path, "http://127.0.0.1:1/entries.db", false, reqwest::Client::new());
        let info = db.lookup(&checksum.to_uppercase()).await.unwrap();

        assert_eq!(info.name, "chart");
        assert_eq!(info.method, IdentificationMethod::FileDb);
    }

    #[tokio::test]
    async fn test_file_is_read_once_until_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.db");
        let db = FileChecksumDb::new(&path, "http://127.0.0.1:1/entries.db", false, reqwest::Client::new());

        assert_eq!(db.len().await, 0);

        tokio::fs::write(&path, format!("{}|three|0.156.1|manual\n", "d".repeat(64)))
            .await
            .unwrap();
        assert_eq!(db.len().await, 0);

        // Remote download fails, so the reload falls back to the local file
        db.set_remote(true).await;
        assert_eq!(db.len().await, 1);
    }

    #[tokio::test]
    async fn test_slow_download_falls_back_to_local() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("{}|remote|1.0|manual\n", "e".repeat(64)))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.db");
        tokio::fs::write(&path, format!("{}|local|2.0|manual\n", "f".repeat(64)))
            .await
            .unwrap();

        let db = FileChecksumDb::new(&path, format!("{}/entries.db", server.uri()), true, reqwest::Client::new())
            .with_download_timeout(Duration::from_millis(200));

        let started = std::time::Instant::now();
        assert_eq!(db.len().await, 1);
        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(db.lookup(&"f".repeat(64)).await.unwrap().name, "local");
    }

    #[tokio::test]
    async fn test_dropped_caller_does_not_restart_load() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("{}|remote|1.0|manual\n", "e".repeat(64)))
                    .set_delay(Duration::from_millis(500)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let db = FileChecksumDb::new(
            dir.path().join("entries.db"),
            format!("{}/entries.db", server.uri()),
            true,
            reqwest::Client::new(),
        );

        let early = tokio::time::timeout(Duration::from_millis(100), db.len()).await;
        assert!(early.is_err());

        assert_eq!(db.len().await, 1);
        assert_eq!(db.lookup(&"e".repeat(64)).await.unwrap().name, "remote");
    }
}
