use wildmatch::WildMatch;

/// Bypass-list matcher for fixed-proxy profiles
///
/// Hosts on the list connect directly instead of going through the proxy.
/// Entries are wildcard patterns (`*.example.com`, `127.0.0.1`, `localhost`).
#[derive(Debug, Clone, Default)]
pub struct BypassMatcher {
    entries: Vec<String>,
}

impl BypassMatcher {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// True when any bypass entry matches the host. An empty list bypasses
    /// nothing.
    pub fn matches(&self, host: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| WildMatch::new(entry).matches(host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bypass_matching() {
        // Empty list = nothing bypassed
        let matcher = BypassMatcher::default();
        assert!(!matcher.matches("localhost"));

        // Exact entries
        let matcher = BypassMatcher::new(vec!["127.0.0.1".to_string(), "localhost".to_string()]);
        assert!(matcher.matches("localhost"));
        assert!(matcher.matches("127.0.0.1"));
        assert!(!matcher.matches("example.com"));

        // Wildcards
        let matcher = BypassMatcher::new(vec!["*.internal.corp".to_string()]);
        assert!(matcher.matches("git.internal.corp"));
        assert!(!matcher.matches("internal.corp"));
    }
}
