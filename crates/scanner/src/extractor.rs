use crate::client::HttpFetch;
use netweather_utils::to_absolute_url;
use scraper::{Html, Selector};
use std::sync::Arc;

/// Collects the external scripts referenced by a page
pub struct ScriptExtractor {
    fetcher: Arc<dyn HttpFetch>,
}

impl ScriptExtractor {
    pub fn new(fetcher: Arc<dyn HttpFetch>) -> Self {
        Self { fetcher }
    }

    /// Absolute `<script src>` URLs of the page in document order.
    ///
    /// Any failure yields an empty list.
    pub async fn extract(&self, page_url: &str) -> Vec<String> {
        let response = match self.fetcher.fetch(page_url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to fetch page {}: {}", page_url, e);
                return Vec::new();
            }
        };

        if !response.is_success() {
            tracing::warn!("Page {} returned HTTP {}", page_url, response.status);
            return Vec::new();
        }
        if !response.is_html() {
            tracing::warn!(
                "Page {} is not HTML ({})",
                page_url,
                response.content_type.as_deref().unwrap_or_default()
            );
            return Vec::new();
        }

        let html = String::from_utf8_lossy(&response.body);
        let scripts = extract_script_sources(&html, &response.final_url);
        tracing::debug!("Found {} script(s) on {}", scripts.len(), page_url);
        scripts
    }
}

/// Resolves every non-empty `<script src>` of `html` against `base`
pub fn extract_script_sources(html: &str, base: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse("script[src]") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .filter_map(|src| match to_absolute_url(base, src) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!("Skipping script source: {}", e);
                None
            }
        })
        .collect()
}
