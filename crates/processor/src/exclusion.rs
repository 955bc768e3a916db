use netweather_utils::{host_of, url_scheme};

/// Hosts that are never scanned; subdomains of a listed domain match too
#[derive(Debug, Clone, Default)]
pub struct ExclusionPolicy {
    domains: Vec<String>,
}

impl ExclusionPolicy {
    pub fn new(domains: &[String]) -> Self {
        Self {
            domains: domains
                .iter()
                .map(|d| d.trim().trim_end_matches('.').to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    pub fn is_excluded(&self, url: &str) -> bool {
        let Some(host) = input_host(url) else {
            return false;
        };

        self.domains.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

/// Host of a URL list entry, which may lack a scheme
fn input_host(url: &str) -> Option<String> {
    let url = url.trim();
    if url_scheme(url).is_some() {
        host_of(url)
    } else {
        host_of(&format!("http://{}", url.strip_prefix("//").unwrap_or(url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ExclusionPolicy {
        ExclusionPolicy::new(&["login.live.com".to_string(), "Example.org".to_string()])
    }

    #[test]
    fn test_exact_and_subdomain_matches() {
        let policy = policy();
        assert!(policy.is_excluded("https://login.live.com/oauth"));
        assert!(policy.is_excluded("login.live.com"));
        assert!(policy.is_excluded("http://a.b.example.org/"));
        assert!(policy.is_excluded("EXAMPLE.ORG:8080/path"));
        assert!(policy.is_excluded("login.live.com/oauth?redirect_uri=https://app.test/cb"));
    }

    #[test]
    fn test_non_matches() {
        let policy = policy();
        assert!(!policy.is_excluded("https://notexample.org/"));
        assert!(!policy.is_excluded("https://live.com/"));
        assert!(!policy.is_excluded("app.test/cb?next=https://login.live.com/"));
        assert!(!policy.is_excluded("not a url at all"));
        assert!(!ExclusionPolicy::default().is_excluded("https://login.live.com/"));
    }
}
