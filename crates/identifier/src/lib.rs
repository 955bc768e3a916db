mod api;
mod cache;
mod errors;
mod file_db;
mod identifier;
mod known;
mod sources;
pub mod strategies;

pub use api::PublicDataClient;
pub use cache::ChecksumCache;
pub use errors::{IdentifierError, Result};
pub use file_db::{parse_entries, FileChecksumDb};
pub use identifier::LibraryIdentifier;
pub use known::lookup_known;
pub use sources::{ChecksumSource, LocalChecksumSource, PublicDataSource, StoreChecksumSource};
pub use strategies::IdentificationStrategy;
