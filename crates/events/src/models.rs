use netweather_models::{IdentificationMethod, ProgressSnapshot, ScanStatistics, UrlResult};
use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicBool;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    // Application lifecycle
    Starting,
    Shutdown,

    // Configuration
    ConfigLoading { path: String },
    ConfigLoaded { workers: usize, use_db: bool },
    ConfigCreated { path: String },
    ConfigMigrated { added_fields: Vec<String> },

    // Inputs & storage
    UrlListLoaded { path: String, count: usize },
    StorageReady { backend: String },

    // Run
    RunStarted { total: usize, workers: usize },
    UrlProcessed { result: Box<UrlResult>, progress: ProgressSnapshot },
    RunFinished {
        progress: ProgressSnapshot,
        methods: Vec<(IdentificationMethod, usize)>,
    },
    RunCancelled { progress: ProgressSnapshot },

    // Stored results
    Statistics { stats: Box<ScanStatistics> },

    // Errors
    Error { context: String, error: String },
}

/// Console sink for application events.
///
/// Only the result collector emits run events, so output is never interleaved.
pub struct EventBus {
    pub(super) verbose: AtomicBool,
}
