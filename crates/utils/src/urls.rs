use crate::UtilsError;
use url::Url;

const STRIPPED_SUFFIXES: &[&str] = &[".production", ".prod", ".min"];

/// Resolves `href` against the page it was found on
pub fn to_absolute_url(base: &str, href: &str) -> Result<String, UtilsError> {
    let base_url =
        Url::parse(base).map_err(|e| UtilsError::InvalidUrl(base.to_string(), e.to_string()))?;
    let resolved = base_url
        .join(href.trim())
        .map_err(|e| UtilsError::InvalidUrl(href.to_string(), e.to_string()))?;
    Ok(resolved.to_string())
}

/// Scheme of `input` when it starts with `scheme://`.
///
/// Only the prefix is inspected, so `example.com/?next=https://x.test` has none.
pub fn url_scheme(input: &str) -> Option<&str> {
    let (scheme, _) = input.split_once("://")?;
    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let valid = starts_alpha && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

/// Lower-cased host of an absolute URL
pub fn host_of(value: &str) -> Option<String> {
    Url::parse(value)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
}

/// Best-effort library name from a script URL's file name.
///
/// `https://cdn.example.com/js/react.production.min.js?v=2` → `react`
pub fn name_from_url(script_url: &str) -> String {
    let path = script_url
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    let file_name = path.rsplit('/').next().unwrap_or_default();

    let mut stem = match file_name.rfind('.') {
        Some(idx) => file_name[..idx].to_string(),
        None => file_name.to_string(),
    };
    for suffix in STRIPPED_SUFFIXES {
        stem = stem.replace(suffix, "");
    }

    let cleaned: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned.to_lowercase()
    }
}

/// Normalizes names captured from banners and comments (`jQuery.min` → `jquery`)
pub fn clean_library_name(name: &str) -> String {
    let name = name
        .to_lowercase()
        .replace(".js", "")
        .replace(".min", "")
        .replace('_', "-");
    let name = name.trim();

    match name {
        "jquery-ui" | "jqueryui" => "jquery".to_string(),
        "reactjs" => "react".to_string(),
        "angularjs" => "angular".to_string(),
        "vuejs" => "vue".to_string(),
        "momentjs" => "moment".to_string(),
        "d3js" => "d3".to_string(),
        "backbonejs" => "backbone".to_string(),
        "underscorejs" => "underscore".to_string(),
        other => other.to_string(),
    }
}

/// Longest prefix of `text` that fits in `max_bytes` without splitting a character
pub fn truncate_at_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
