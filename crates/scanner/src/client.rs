use crate::ScanError;
use bytes::Bytes;
use netweather_config::{HttpSettings, ReachabilitySettings};
use std::time::Duration;

/// Outcome of a reachability probe (body discarded)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    /// URL after redirects
    pub final_url: String,
}

#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: u16,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchedResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Absent content types are treated as HTML
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map_or(true, |ct| ct.to_ascii_lowercase().contains("html"))
    }
}

/// HTTP transport used by the scanner components.
///
/// Transport failures (DNS, TLS, timeout, redirect limit) are errors; any
/// answered request is a response whatever its status.
#[async_trait::async_trait]
pub trait HttpFetch: Send + Sync {
    /// GET `url` with an explicit timeout, following redirects
    async fn probe(&self, url: &str, timeout: Duration) -> Result<ProbeResponse, ScanError>;

    /// GET `url` with the default timeout and read the whole body
    async fn fetch(&self, url: &str) -> Result<FetchedResponse, ScanError>;
}

/// `reqwest` backed fetcher
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(
        user_agent: &str,
        default_timeout: Duration,
        max_redirects: usize,
    ) -> Result<Self, ScanError> {
        let client = reqwest::Client::builder()
            .timeout(default_timeout)
            .redirect(reqwest::redirect::Policy::limited(max_redirects))
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    pub fn from_settings(
        http: &HttpSettings,
        reachability: &ReachabilitySettings,
    ) -> Result<Self, ScanError> {
        Self::new(&http.user_agent, http.request_timeout(), reachability.max_redirects)
    }
}

#[async_trait::async_trait]
impl HttpFetch for HttpClient {
    async fn probe(&self, url: &str, timeout: Duration) -> Result<ProbeResponse, ScanError> {
        tracing::debug!("Probing {}", url);
        let response = self.client.get(url).timeout(timeout).send().await?;

        Ok(ProbeResponse {
            status: response.status().as_u16(),
            final_url: response.url().to_string(),
        })
    }

    async fn fetch(&self, url: &str) -> Result<FetchedResponse, ScanError> {
        tracing::debug!("Fetching {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        Ok(FetchedResponse {
            status,
            final_url,
            content_type,
            body,
        })
    }
}
