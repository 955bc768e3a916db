use netweather_models::{IdentificationMethod, LibraryInfo, ScriptFingerprint, UNKNOWN_VERSION};
use netweather_utils::name_from_url;

/// Closes the chain: name guessed from the file name, version unknown
pub struct FallbackStrategy;

impl FallbackStrategy {
    pub fn identify(&self, script: &ScriptFingerprint) -> LibraryInfo {
        LibraryInfo::new(
            name_from_url(&script.url),
            UNKNOWN_VERSION,
            IdentificationMethod::Unknown,
        )
        .with_checksum(script.checksum.clone())
    }
}
