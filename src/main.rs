mod bootstrap;

use netweather_events::{AppEvent, EventBus};
use netweather_identifier::LibraryIdentifier;
use netweather_processor::{ParallelProcessor, ProcessError, ProcessorConfig};
use netweather_scanner::HttpClient;
use netweather_storage::RECENT_SCANS_LIMIT;
use netweather_config::{Config, StorageBackend};
use crate::bootstrap::{config, logging, storage};
use anyhow::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    logging::initialize();

    let Some(command) = std::env::args().nth(1) else {
        eprintln!("Usage: netweather <url_file>");
        eprintln!("       netweather stats");
        std::process::exit(2);
    };

    let events = EventBus::new(false);
    events.emit(AppEvent::Starting);

    let config_path = std::env::var("NETWEATHER_CONFIG").unwrap_or_else(|_| "netweather.toml".to_string());
    let config = config::load(&config_path, &events).await?;

    if command == "stats" {
        return show_statistics(&config, &events).await;
    }

    let urls = config::load_url_list(&command, &events).await?;

    let store = storage::initialize(&config, &events).await?;

    let fetcher = Arc::new(HttpClient::from_settings(&config.http, &config.reachability)?);
    let identifier = Arc::new(LibraryIdentifier::new(&config.identifier, store.clone())?);

    let mut processor = ParallelProcessor::new(
        ProcessorConfig::from_config(&config),
        fetcher,
        identifier,
        Arc::clone(&events),
    );
    if let Some(store) = store {
        processor = processor.with_store(store);
    }

    let token = CancellationToken::new();
    let shutdown_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling scan...");
            shutdown_token.cancel();
        }
    });

    match processor.process_urls(token, urls).await {
        Ok(_) => {
            events.emit(AppEvent::Shutdown);
            Ok(())
        }
        Err(ProcessError::Cancelled { collected }) => {
            events.emit(AppEvent::Shutdown);
            anyhow::bail!("Scan cancelled, {} result(s) collected", collected)
        }
        Err(e) => {
            events.emit(AppEvent::Error {
                context: "Scan failed".to_string(),
                error: e.to_string(),
            });
            Err(e.into())
        }
    }
}

async fn show_statistics(config: &Config, events: &Arc<EventBus>) -> Result<()> {
    if config.storage.backend == StorageBackend::Memory {
        anyhow::bail!("Statistics need a persistent store: set storage.backend = \"jsonl\"");
    }

    let store = storage::open(config).await?;
    let stats = store.statistics(RECENT_SCANS_LIMIT).await?;
    events.emit(AppEvent::Statistics {
        stats: Box::new(stats),
    });
    events.emit(AppEvent::Shutdown);
    Ok(())
}
