mod code_analysis;
mod fallback;
mod lookup;
mod url_pattern;

pub use code_analysis::CodeAnalysisStrategy;
pub use fallback::FallbackStrategy;
pub use lookup::ChecksumLookupStrategy;
pub use url_pattern::UrlPatternStrategy;

use netweather_models::{LibraryInfo, ScriptFingerprint};

/// One step of the identification chain; `None` passes to the next step
#[async_trait::async_trait]
pub trait IdentificationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn identify(&self, script: &ScriptFingerprint) -> Option<LibraryInfo>;
}
