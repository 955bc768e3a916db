use netweather_config::{Config, StorageBackend as StorageBackendType};
use netweather_events::{AppEvent, EventBus};
use netweather_storage::{JsonLinesStore, MemoryStore, ResultStore};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Builds the result store when persistence is enabled
pub async fn initialize(config: &Config, events: &Arc<EventBus>) -> Result<Option<Arc<dyn ResultStore>>> {
    if !config.scanner.use_db {
        return Ok(None);
    }

    let store = open(config).await?;
    events.emit(AppEvent::StorageReady {
        backend: store.name().to_string(),
    });

    Ok(Some(store))
}

/// Opens the configured backend regardless of `use_db`
pub async fn open(config: &Config) -> Result<Arc<dyn ResultStore>> {
    match config.storage.backend {
        StorageBackendType::Memory => Ok(Arc::new(MemoryStore::new()) as Arc<dyn ResultStore>),
        StorageBackendType::Jsonl => {
            let store = JsonLinesStore::open(&config.storage.path)
                .await
                .with_context(|| format!("Failed to open result store {}", config.storage.path))?;
            tracing::info!("Opened JSON-lines store at {}", store.path().display());
            Ok(Arc::new(store) as Arc<dyn ResultStore>)
        }
    }
}
