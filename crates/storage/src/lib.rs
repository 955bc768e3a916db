mod backend;
mod index;
mod memory;
mod jsonl;
mod stats;
mod errors;

pub use backend::ResultStore;
pub use memory::MemoryStore;
pub use jsonl::JsonLinesStore;
pub use stats::{summarize, RECENT_SCANS_LIMIT};
pub use errors::*;
