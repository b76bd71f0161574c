use wildmatch::WildMatch;

use crate::handler::http::rule::Rule;

/// select_rule picks the proxy rule for a request path, if any. Matching is
/// on the literal byte prefix; the rule set is sorted longest-prefix-first
/// when the config is built, so the first hit is the most specific one and
/// `/api/public` is never shadowed by `/api`.
pub fn select_rule<'a>(rules: &'a [Rule], path: &str) -> Option<&'a Rule> {
    rules.iter().find(|rule| path.starts_with(rule.prefix.as_str()))
}

/// AllowedHosts is the admission check run against the request `Host` header
/// before any proxy or file logic. Entries may be exact hostnames or
/// wildcard patterns.
#[derive(Debug, Clone, Default)]
pub struct AllowedHosts {
    patterns: Vec<WildMatch>,
}

impl AllowedHosts {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: entries
                .into_iter()
                .map(|entry| WildMatch::new(entry.as_ref()))
                .collect(),
        }
    }

    /// Loopback names pass without configuration. The port part of the
    /// header value is ignored.
    pub fn permits(&self, host: &str) -> bool {
        let name = strip_port(host);
        if name.eq_ignore_ascii_case("localhost") || name == "127.0.0.1" || name == "::1" {
            return true;
        }
        self.patterns.iter().any(|pattern| pattern.matches(name))
    }
}

/// Drops a `:port` suffix from a Host header value. Bracketed IPv6 forms
/// keep the address inside the brackets; a bare IPv6 address has no port to
/// strip.
fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        match rest.find(']') {
            Some(end) => &rest[..end],
            None => host,
        }
    } else {
        match host.rfind(':') {
            Some(colon) if !host[..colon].contains(':') => &host[..colon],
            _ => host,
        }
    }
}
