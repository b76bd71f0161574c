use std::fmt;

use http::uri::{Authority, Scheme};

use crate::handler::http::action::PrefixRewrite;

/// Rule forwards requests whose path starts with `prefix` to `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Literal path prefix the rule matches on.
    pub prefix: String,
    /// The origin requests are forwarded to.
    pub target: Target,
    /// Replace the forwarded `Host` header with the target authority.
    pub change_origin: bool,
    /// Optional prefix replacement applied to the path before forwarding.
    pub rewrite: Option<PrefixRewrite>,
}

/// Target is a bare origin: scheme and authority, no path or query.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub scheme: Scheme,
    pub authority: Authority,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)
    }
}
