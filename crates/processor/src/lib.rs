mod collector;
mod config;
mod errors;
mod exclusion;
mod pipeline;
mod processor;
mod progress;

pub use config::ProcessorConfig;
pub use errors::{ProcessError, Result};
pub use exclusion::ExclusionPolicy;
pub use pipeline::UrlPipeline;
pub use processor::{ParallelProcessor, RunReport};
pub use progress::ProgressTracker;
