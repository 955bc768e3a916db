// Re-export all public APIs from the workspace crates

pub use netweather_models::*;
pub use netweather_events::*;
pub use netweather_utils::*;
pub use netweather_filesystem::*;
pub use netweather_config::*;
pub use netweather_storage::*;
pub use netweather_scanner::*;
pub use netweather_identifier::*;
pub use netweather_processor::*;

/// Prelude module for convenient imports
pub mod prelude {
    // Core models
    pub use netweather_models::{
        IdentificationMethod, LibraryInfo, ProgressSnapshot, ScanResult, UrlJob, UrlReachability,
        UrlResult,
    };

    // Events
    pub use netweather_events::{AppEvent, EventBus};

    // Configuration
    pub use netweather_config::Config;

    // Scanner
    pub use netweather_scanner::{HttpClient, HttpFetch, ReachabilityChecker};

    // Identification
    pub use netweather_identifier::LibraryIdentifier;

    // Processing
    pub use netweather_processor::{ParallelProcessor, ProcessorConfig};

    // Storage
    pub use netweather_storage::{JsonLinesStore, MemoryStore, ResultStore};

    // Filesystem
    pub use netweather_filesystem::FileSystem;
}
