use netweather_config::Config;
use netweather_events::{AppEvent, EventBus};
use netweather_filesystem::FileSystem;
use anyhow::Result;
use std::sync::Arc;

pub async fn load(config_path: &str, events: &Arc<EventBus>) -> Result<Config> {
    let abs_config_path = FileSystem::get_absolute_path_string(config_path)?;

    events.emit(AppEvent::ConfigLoading {
        path: abs_config_path,
    });

    let config = Config::from_file_with_events(config_path, Some(events)).await?;

    events.emit(AppEvent::ConfigLoaded {
        workers: config.scanner.max_workers,
        use_db: config.scanner.use_db,
    });

    Ok(config)
}

pub async fn load_url_list(url_file: &str, events: &Arc<EventBus>) -> Result<Vec<String>> {
    let urls = FileSystem::read_url_list(url_file).await?;

    events.emit(AppEvent::UrlListLoaded {
        path: FileSystem::get_absolute_path_string(url_file)?,
        count: urls.len(),
    });

    Ok(urls)
}
