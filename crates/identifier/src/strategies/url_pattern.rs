use super::IdentificationStrategy;
use netweather_models::{IdentificationMethod, LibraryInfo, ScriptFingerprint};
use regex::Regex;
use std::sync::LazyLock;

struct CdnPattern {
    regex: Regex,
    /// Used when the pattern has no version group
    fixed_version: Option<&'static str>,
}

impl CdnPattern {
    fn versioned(pattern: &str) -> Self {
        Self {
            regex: Regex::new(pattern).expect("CDN regex is valid"),
            fixed_version: None,
        }
    }

    fn unversioned(pattern: &str, version: &'static str) -> Self {
        Self {
            regex: Regex::new(pattern).expect("CDN regex is valid"),
            fixed_version: Some(version),
        }
    }
}

// Versioned forms come before their unversioned fallbacks
static CDN_PATTERNS: LazyLock<Vec<CdnPattern>> = LazyLock::new(|| {
    vec![
        CdnPattern::versioned(r"cdnjs\.cloudflare\.com/ajax/libs/([^/]+)/([^/]+)/"),
        CdnPattern::versioned(r"unpkg\.com/([^@/]+)@([^/]+)/"),
        CdnPattern::unversioned(r"unpkg\.com/([^@/]+)/", "latest"),
        CdnPattern::versioned(r"cdn\.jsdelivr\.net/npm/([^@/]+)@([^/]+)/"),
        CdnPattern::unversioned(r"cdn\.jsdelivr\.net/npm/([^@/]+)/", "latest"),
        CdnPattern::versioned(r"googleapis\.com/ajax/libs/([^/]+)/([^/]+)/"),
        CdnPattern::unversioned(r"github\.githubassets\.com/assets/([^-]+)", "github-hosted"),
    ]
});

/// Name and version from well-known CDN URL layouts
pub fn match_cdn_url(script_url: &str) -> Option<LibraryInfo> {
    CDN_PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.regex.captures(script_url)?;
        let name = caps.get(1)?.as_str();
        let version = match pattern.fixed_version {
            Some(version) => version.to_string(),
            None => caps.get(2)?.as_str().to_string(),
        };

        let name = name.replace(".min", "").replace('_', "-").to_lowercase();
        Some(LibraryInfo::new(name, version, IdentificationMethod::UrlPattern))
    })
}

pub struct UrlPatternStrategy;

#[async_trait::async_trait]
impl IdentificationStrategy for UrlPatternStrategy {
    fn name(&self) -> &'static str {
        "url-pattern"
    }

    async fn identify(&self, script: &ScriptFingerprint) -> Option<LibraryInfo> {
        match_cdn_url(&script.url)
    }
}
