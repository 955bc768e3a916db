use super::IdentificationStrategy;
use netweather_models::{IdentificationMethod, LibraryInfo, ScriptFingerprint, UNKNOWN_VERSION};
use netweather_utils::{clean_library_name, name_from_url, truncate_at_boundary};
use regex::Regex;
use std::sync::LazyLock;

const CONTEXT_WINDOW: usize = 3000;
const VERSION_COMMENT_WINDOW: usize = 2000;
const SIGNATURE_WINDOW: usize = 5000;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("code analysis regex is valid")
}

/// Library banners; the version is the first non-empty group
static CONTEXT_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        ("jquery", regex(r"(?i)jQuery\s+v(\d+\.[\d.]+[\w\-]*)|jQuery JavaScript Library\s+v(\d+\.[\d.]+[\w\-]*)")),
        ("react", regex(r"(?i)React\s+v(\d+\.[\d.]+[\w\-]*)|React\.js\s+v(\d+\.[\d.]+[\w\-]*)")),
        ("bootstrap", regex(r"(?i)Bootstrap\s+v(\d+\.[\d.]+[\w\-]*)")),
        ("angular", regex(r"(?i)Angular(?:JS)?\s+v(\d+\.[\d.]+[\w\-]*)")),
        ("vue", regex(r"(?i)Vue\.js\s+v(\d+\.[\d.]+[\w\-]*)|Vue\s+v(\d+\.[\d.]+[\w\-]*)")),
        ("lodash", regex(r"(?i)lodash\s+v(\d+\.[\d.]+[\w\-]*)")),
        ("moment", regex(r"(?i)moment\.js\s+v(\d+\.[\d.]+[\w\-]*)")),
        ("d3", regex(r"(?i)d3\.js\s+v(\d+\.[\d.]+[\w\-]*)|D3\s+v(\d+\.[\d.]+[\w\-]*)")),
        ("backbone", regex(r"(?i)backbone\.js\s+v(\d+\.[\d.]+[\w\-]*)")),
        ("underscore", regex(r"(?i)underscore\.js\s+v(\d+\.[\d.]+[\w\-]*)")),
    ]
});

/// Name + version comment forms first, then version-only forms
static NAMED_VERSION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        regex(r"(?i)/\*!?\s*([a-zA-Z][a-zA-Z0-9\-_.]*)\s+v?(\d+\.[\d.]+[\w\-+]*)"),
        regex(r"(?i)//\s*([a-zA-Z][a-zA-Z0-9\-_.]*)\s+v?(\d+\.[\d.]+[\w\-+]*)"),
    ]
});

static VERSION_ONLY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        regex(r"(?i)@version\s+v?(\d+\.[\d.]+[\w\-+]*)"),
        regex(r#"(?i)version:\s*["']v?(\d+\.[\d.]+[\w\-+]*)["']"#),
        regex(r#"(?i)"version"\s*:\s*"v?(\d+\.[\d.]+[\w\-+]*)""#),
        regex(r#"(?i)build:\s*["']?(\d+\.[\d.]+[\w\-+]*)["']?"#),
        regex(r"(?i)Built on:\s*[\d\-\s:]+v?(\d+\.[\d.]+[\w\-+]*)"),
    ]
});

struct Signature {
    name: &'static str,
    marker: Regex,
    version: Option<Regex>,
}

fn signature(name: &'static str, marker: &str, version: Option<&str>) -> Signature {
    Signature {
        name,
        marker: regex(marker),
        version: version.map(regex),
    }
}

static SIGNATURES: LazyLock<Vec<Signature>> = LazyLock::new(|| {
    vec![
        signature(
            "jquery",
            r"(?i)jquery|^\s*\(function\s*\(\s*\$|jQuery\.fn\.jquery",
            Some(r#"(?i)jquery\.fn\.jquery\s*=\s*["'](\d+\.[\d.]+[\w\-]*)["']"#),
        ),
        signature(
            "react",
            r"(?i)react|React\.version|ReactDOM",
            Some(r#"(?i)React\.version\s*=\s*["'](\d+\.[\d.]+[\w\-]*)["']"#),
        ),
        signature(
            "angular",
            r"(?i)angular\.module|angular\.version",
            Some(r#"(?i)angular\.version\s*=\s*["'](\d+\.[\d.]+[\w\-]*)["']"#),
        ),
        signature(
            "vue",
            r"(?i)vue\.version|Vue\.prototype",
            Some(r#"(?i)Vue\.version\s*=\s*["'](\d+\.[\d.]+[\w\-]*)["']"#),
        ),
        signature("bootstrap", r"(?i)bootstrap|\.modal|\.tooltip|\.popover", None),
        signature(
            "lodash",
            r"(?i)lodash|_\.VERSION",
            Some(r#"(?i)_\.VERSION\s*=\s*["'](\d+\.[\d.]+[\w\-]*)["']"#),
        ),
        signature(
            "underscore",
            r"(?i)underscore|_\.VERSION",
            Some(r#"(?i)_\.VERSION\s*=\s*["'](\d+\.[\d.]+[\w\-]*)["']"#),
        ),
        signature(
            "moment",
            r"(?i)moment\.js|moment\.version",
            Some(r#"(?i)moment\.version\s*=\s*["'](\d+\.[\d.]+[\w\-]*)["']"#),
        ),
        signature(
            "d3",
            r"(?i)d3\.version|d3\.select",
            Some(r#"(?i)d3\.version\s*=\s*["'](\d+\.[\d.]+[\w\-]*)["']"#),
        ),
    ]
});

/// Banner, version comment, then code signature; first match wins
pub fn analyze_code(content: &str, script_url: &str) -> Option<LibraryInfo> {
    analyze_context(content)
        .or_else(|| find_version_comment(content, script_url))
        .or_else(|| detect_signature(content))
}

fn analyze_context(content: &str) -> Option<LibraryInfo> {
    let header = truncate_at_boundary(content, CONTEXT_WINDOW);

    CONTEXT_PATTERNS.iter().find_map(|(name, pattern)| {
        let caps = pattern.captures(header)?;
        let version = caps
            .iter()
            .skip(1)
            .flatten()
            .map(|m| m.as_str())
            .find(|v| !v.is_empty())?;

        Some(LibraryInfo::new(
            clean_library_name(name),
            version,
            IdentificationMethod::ContextAnalysis,
        ))
    })
}

fn find_version_comment(content: &str, script_url: &str) -> Option<LibraryInfo> {
    let header = truncate_at_boundary(content, VERSION_COMMENT_WINDOW);

    let named = NAMED_VERSION_PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.captures(header)?;
        let name = clean_library_name(caps.get(1)?.as_str());
        let version = caps.get(2)?.as_str().trim().to_string();
        Some(LibraryInfo::new(name, version, IdentificationMethod::CodeAnalysis))
    });
    if named.is_some() {
        return named;
    }

    VERSION_ONLY_PATTERNS.iter().find_map(|pattern| {
        let version = pattern.captures(header)?.get(1)?.as_str().trim().to_string();
        Some(LibraryInfo::new(
            name_from_url(script_url),
            version,
            IdentificationMethod::CodeAnalysis,
        ))
    })
}

fn detect_signature(content: &str) -> Option<LibraryInfo> {
    let code = truncate_at_boundary(content, SIGNATURE_WINDOW);

    SIGNATURES.iter().find_map(|sig| {
        if !sig.marker.is_match(code) {
            return None;
        }

        let version = sig
            .version
            .as_ref()
            .and_then(|re| re.captures(code))
            .and_then(|caps| caps.get(1))
            .map_or(UNKNOWN_VERSION, |m| m.as_str());

        Some(LibraryInfo::new(sig.name, version, IdentificationMethod::SignatureAnalysis))
    })
}

pub struct CodeAnalysisStrategy;

#[async_trait::async_trait]
impl IdentificationStrategy for CodeAnalysisStrategy {
    fn name(&self) -> &'static str {
        "code-analysis"
    }

    async fn identify(&self, script: &ScriptFingerprint) -> Option<LibraryInfo> {
        analyze_code(&script.content, &script.url)
    }
}
