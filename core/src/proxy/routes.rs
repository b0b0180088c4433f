//! Route table - maps a path prefix (or hostname) to an upstream base URL
//!
//! Entries are checked in declaration order and the first match wins, so a
//! more specific prefix (`openrouter/api`) must be declared before a shorter
//! one it overlaps with (`openrouter`).

/// A single upstream route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    path_segment: String,
    target: String,
    or_hostname: Option<String>,
    prefix: String,
}

impl RouteEntry {
    pub fn new(path_segment: impl Into<String>, target: impl Into<String>) -> Self {
        let path_segment = path_segment.into();
        let prefix = format!("/{}/", path_segment);
        Self {
            path_segment,
            target: target.into(),
            or_hostname: None,
            prefix,
        }
    }

    /// Also match any request whose hostname equals `hostname`, whatever its path.
    pub fn or_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.or_hostname = Some(hostname.into().to_ascii_lowercase());
        self
    }

    pub fn path_segment(&self) -> &str {
        &self.path_segment
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn hostname(&self) -> Option<&str> {
        self.or_hostname.as_deref()
    }

    /// `/<segment>/...` matches; `/<segment>` alone does not.
    pub fn matches(&self, path: &str, hostname: Option<&str>) -> bool {
        if path.starts_with(&self.prefix) {
            return true;
        }
        match (&self.or_hostname, hostname) {
            (Some(expected), Some(actual)) => expected.eq_ignore_ascii_case(actual),
            _ => false,
        }
    }

    /// Replace the first `/<segment>/` with `/`. For a prefix match that is
    /// the leading one; a hostname match may carry it further in the path.
    pub fn rewrite_path<'a>(&self, path: &'a str) -> std::borrow::Cow<'a, str> {
        if path.contains(&self.prefix) {
            path.replacen(&self.prefix, "/", 1).into()
        } else {
            path.into()
        }
    }

    /// Full upstream URL for an inbound path and raw query string.
    pub fn upstream_url(&self, path: &str, query: Option<&str>) -> String {
        let path = self.rewrite_path(path);
        match query {
            Some(q) if !q.is_empty() => format!("{}{}?{}", self.target, path, q),
            _ => format!("{}{}", self.target, path),
        }
    }
}

/// Immutable, ordered route table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new(entries: Vec<RouteEntry>) -> Self {
        Self { entries }
    }

    /// The compiled-in provider routes
    pub fn builtin() -> Self {
        Self::new(vec![
            RouteEntry::new("generativelanguage", "https://generativelanguage.googleapis.com")
                .or_hostname("gooai.chatkit.app"),
            RouteEntry::new("groq", "https://api.groq.com"),
            RouteEntry::new("anthropic", "https://api.anthropic.com"),
            RouteEntry::new("pplx", "https://api.perplexity.ai"),
            RouteEntry::new("openai", "https://api.openai.com"),
            RouteEntry::new("mistral", "https://api.mistral.ai"),
            RouteEntry::new("openrouter/api", "https://openrouter.ai/api"),
            RouteEntry::new("openrouter", "https://openrouter.ai/api"),
            RouteEntry::new("xai", "https://api.x.ai"),
        ])
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// First entry matching the path prefix or the hostname
    pub fn find(&self, path: &str, hostname: Option<&str>) -> Option<&RouteEntry> {
        self.entries.iter().find(|entry| entry.matches(path, hostname))
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_builtin_route_rewrites_prefix_and_keeps_query() {
        let table = RouteTable::builtin();
        for entry in table.entries() {
            let path = format!("/{}/x", entry.path_segment());
            let found = table.find(&path, None).unwrap();
            assert_eq!(found, entry);
            assert_eq!(
                found.upstream_url(&path, Some("q=1")),
                format!("{}/x?q=1", entry.target())
            );
        }
    }

    #[test]
    fn openrouter_api_wins_over_bare_openrouter() {
        let table = RouteTable::builtin();
        let entry = table.find("/openrouter/api/foo", None).unwrap();

        assert_eq!(entry.path_segment(), "openrouter/api");
        assert_eq!(
            entry.upstream_url("/openrouter/api/foo", None),
            "https://openrouter.ai/api/foo"
        );
    }

    #[test]
    fn bare_openrouter_prefix_still_matches() {
        let table = RouteTable::builtin();
        let entry = table.find("/openrouter/v1/chat/completions", None).unwrap();

        assert_eq!(entry.path_segment(), "openrouter");
        assert_eq!(
            entry.upstream_url("/openrouter/v1/chat/completions", None),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn segment_without_trailing_slash_does_not_match() {
        let table = RouteTable::builtin();
        assert!(table.find("/openrouter", None).is_none());
        assert!(table.find("/openai", None).is_none());
    }

    #[test]
    fn hostname_matches_regardless_of_path() {
        let table = RouteTable::builtin();
        let entry = table
            .find("/v1beta/models/gemini-pro:generateContent", Some("gooai.chatkit.app"))
            .unwrap();

        assert_eq!(entry.path_segment(), "generativelanguage");
        assert_eq!(
            entry.upstream_url("/v1beta/models/gemini-pro:generateContent", Some("key=abc")),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent?key=abc"
        );
    }

    #[test]
    fn hostname_comparison_ignores_case() {
        let table = RouteTable::builtin();
        assert!(table.find("/", Some("GOOAI.chatkit.app")).is_some());
        assert!(table.find("/", Some("other.chatkit.app")).is_none());
    }

    #[test]
    fn unknown_path_has_no_route() {
        let table = RouteTable::builtin();
        assert!(table.find("/unknown/path", Some("localhost")).is_none());
    }

    #[test]
    fn empty_query_adds_no_question_mark() {
        let entry = RouteEntry::new("groq", "https://api.groq.com");
        assert_eq!(
            entry.upstream_url("/groq/openai/v1/models", Some("")),
            "https://api.groq.com/openai/v1/models"
        );
    }

    #[test]
    fn hostname_match_strips_embedded_segment() {
        let table = RouteTable::builtin();
        let path = "/v1beta/generativelanguage/models";
        let entry = table.find(path, Some("gooai.chatkit.app")).unwrap();

        assert_eq!(
            entry.upstream_url(path, None),
            "https://generativelanguage.googleapis.com/v1beta/models"
        );
    }

    #[test]
    fn hostname_match_without_segment_keeps_path() {
        let entry = RouteEntry::new("generativelanguage", "https://generativelanguage.googleapis.com")
            .or_hostname("gooai.chatkit.app");
        assert_eq!(entry.rewrite_path("/v1beta/models"), "/v1beta/models");
    }

    #[test]
    fn only_first_segment_occurrence_is_rewritten() {
        let entry = RouteEntry::new("openai", "https://api.openai.com");
        assert_eq!(entry.rewrite_path("/openai/v1/openai/x"), "/v1/openai/x");
    }
}
