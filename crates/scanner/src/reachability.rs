use crate::client::{HttpFetch, ProbeResponse};
use crate::ScanError;
use netweather_config::ReachabilitySettings;
use netweather_models::{Protocol, UrlReachability};
use netweather_utils::url_scheme;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Determines over which protocols a URL answers
pub struct ReachabilityChecker {
    fetcher: Arc<dyn HttpFetch>,
    timeout: Duration,
}

impl ReachabilityChecker {
    pub fn new(fetcher: Arc<dyn HttpFetch>, settings: &ReachabilitySettings) -> Self {
        Self::with_timeout(fetcher, settings.timeout())
    }

    pub fn with_timeout(fetcher: Arc<dyn HttpFetch>, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    /// Probes the URL; a scheme-less input is tried over both HTTP and HTTPS
    pub async fn check(&self, input: &str) -> Result<UrlReachability, ScanError> {
        let input = input.trim();
        let mut record = UrlReachability::new(input);

        if url_scheme(input).is_some() {
            let parsed = Url::parse(input)
                .map_err(|e| ScanError::InvalidUrl(input.to_string(), e.to_string()))?;

            match parsed.scheme() {
                "http" => {
                    let outcome = self.probe(input).await;
                    apply(&mut record, Protocol::Http, input, outcome);
                }
                "https" => {
                    let outcome = self.probe(input).await;
                    apply(&mut record, Protocol::Https, input, outcome);
                }
                other => return Err(ScanError::UnsupportedScheme(other.to_string())),
            }
        } else {
            let rest = input.strip_prefix("//").unwrap_or(input);
            let http_url = format!("http://{}", rest);
            let https_url = format!("https://{}", rest);
            Url::parse(&http_url)
                .map_err(|e| ScanError::InvalidUrl(input.to_string(), e.to_string()))?;

            let (http, https) = tokio::join!(self.probe(&http_url), self.probe(&https_url));
            apply(&mut record, Protocol::Http, &http_url, http);
            apply(&mut record, Protocol::Https, &https_url, https);
        }

        record.final_url = select_final_url(&record, input);
        Ok(record)
    }

    async fn probe(&self, url: &str) -> Option<ProbeResponse> {
        match self.fetcher.probe(url, self.timeout).await {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::debug!("{} unavailable: {}", url, e);
                None
            }
        }
    }
}

fn apply(
    record: &mut UrlReachability,
    protocol: Protocol,
    requested: &str,
    outcome: Option<ProbeResponse>,
) {
    let Some(response) = outcome else {
        return;
    };

    let redirect = if same_url(requested, &response.final_url) {
        None
    } else {
        Some(response.final_url)
    };

    match protocol {
        Protocol::Http => {
            record.http_available = true;
            record.http_status = Some(response.status);
            record.http_redirect_url = redirect;
        }
        Protocol::Https => {
            record.https_available = true;
            record.https_status = Some(response.status);
            record.https_redirect_url = redirect;
        }
    }
}

/// Compares as parsed URLs so `http://host` and `http://host/` are equal
fn same_url(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn select_final_url(record: &UrlReachability, input: &str) -> Option<String> {
    let protocol = record.best_protocol().or(if record.https_available {
        Some(Protocol::Https)
    } else if record.http_available {
        Some(Protocol::Http)
    } else {
        None
    })?;

    let (redirect, requested) = match protocol {
        Protocol::Http => (&record.http_redirect_url, requested_url(input, Protocol::Http)),
        Protocol::Https => (&record.https_redirect_url, requested_url(input, Protocol::Https)),
    };
    Some(redirect.clone().unwrap_or(requested))
}

fn requested_url(input: &str, protocol: Protocol) -> String {
    if url_scheme(input).is_some() {
        input.to_string()
    } else {
        let rest = input.strip_prefix("//").unwrap_or(input);
        format!("{}://{}", protocol.scheme(), rest)
    }
}
