use crate::client::HttpFetch;
use crate::ScanError;
use netweather_models::ScriptFingerprint;
use netweather_utils::compute_sha256;
use std::sync::Arc;

/// Downloads scripts and content-addresses them
pub struct Fingerprinter {
    fetcher: Arc<dyn HttpFetch>,
}

impl Fingerprinter {
    pub fn new(fetcher: Arc<dyn HttpFetch>) -> Self {
        Self { fetcher }
    }

    pub async fn fingerprint(&self, script_url: &str) -> Result<ScriptFingerprint, ScanError> {
        let response = self.fetcher.fetch(script_url).await?;
        if !response.is_success() {
            return Err(ScanError::HttpStatus {
                url: script_url.to_string(),
                status: response.status,
            });
        }

        Ok(ScriptFingerprint {
            url: script_url.to_string(),
            checksum: compute_sha256(&response.body),
            content: String::from_utf8_lossy(&response.body).into_owned(),
        })
    }
}
