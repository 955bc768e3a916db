mod client;
mod errors;
mod extractor;
mod fingerprint;
mod reachability;

pub use client::{FetchedResponse, HttpClient, HttpFetch, ProbeResponse};
pub use errors::{Result, ScanError};
pub use extractor::{extract_script_sources, ScriptExtractor};
pub use fingerprint::Fingerprinter;
pub use reachability::ReachabilityChecker;
