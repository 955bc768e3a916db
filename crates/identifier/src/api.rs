use crate::IdentifierError;
use netweather_models::{IdentificationMethod, LibraryInfo, UNKNOWN_VERSION};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ChecksumResponse {
    #[serde(default)]
    results: Vec<ChecksumMatch>,
}

#[derive(Debug, Deserialize)]
struct ChecksumMatch {
    package: PackageInfo,
}

#[derive(Debug, Deserialize)]
struct PackageInfo {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
}

/// Client for the public checksum → package API
pub struct PublicDataClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl PublicDataClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// `None` when the API does not know the checksum or answers garbage
    pub async fn lookup(&self, checksum: &str) -> Result<Option<LibraryInfo>, IdentifierError> {
        let url = format!("{}/v1/checksums/{}", self.base_url, checksum);
        let response = self.client.get(&url).timeout(self.timeout).send().await?;

        if response.status() != reqwest::StatusCode::OK {
            tracing::debug!("Checksum API returned {} for {}", response.status(), checksum);
            return Ok(None);
        }

        let body: ChecksumResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Undecodable checksum API response: {}", e);
                return Ok(None);
            }
        };

        let Some(first) = body.results.into_iter().next() else {
            return Ok(None);
        };
        let name = first.package.name.trim().to_lowercase();
        if name.is_empty() {
            return Ok(None);
        }
        let version = match first.package.version.trim() {
            "" => UNKNOWN_VERSION.to_string(),
            v => v.to_string(),
        };

        Ok(Some(
            LibraryInfo::new(name, version, IdentificationMethod::PublicdataApi)
                .with_checksum(checksum),
        ))
    }
}
