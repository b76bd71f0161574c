use anyhow::Result;
use http::header::HOST;
use http::uri::Uri;
use http::HeaderValue;
use hyper::{Body, Request};
use tracing::debug;

use crate::handler::http::rule::Rule;

/// PrefixRewrite replaces the leading `from` of a path with `to`. It is
/// total: paths that do not start with `from` pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixRewrite {
    pub from: String,
    pub to: String,
}

impl PrefixRewrite {
    pub fn apply(&self, path: &str) -> String {
        match path.strip_prefix(self.from.as_str()) {
            Some(rest) => format!("{}{}", self.to, rest),
            None => path.to_string(),
        }
    }
}

/// forward_uri builds the upstream URI for a matched rule: the target
/// origin, the (possibly rewritten) path, and the query string verbatim.
pub fn forward_uri(rule: &Rule, uri: &Uri) -> Result<Uri> {
    let path = match &rule.rewrite {
        Some(rewrite) => rewrite.apply(uri.path()),
        None => uri.path().to_string(),
    };
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path,
    };

    let mut parts = uri.clone().into_parts();
    parts.scheme = Some(rule.target.scheme.clone());
    parts.authority = Some(rule.target.authority.clone());
    parts.path_and_query = Some(path_and_query.parse()?);
    Ok(Uri::from_parts(parts)?)
}

/// apply_proxy_action points the request at the rule target. With
/// `change_origin` the `Host` header is replaced by the target authority;
/// otherwise the client's value is forwarded untouched.
pub fn apply_proxy_action(rule: &Rule, request: &mut Request<Body>) -> Result<()> {
    *request.uri_mut() = forward_uri(rule, request.uri())?;
    if rule.change_origin {
        request
            .headers_mut()
            .insert(HOST, HeaderValue::from_str(rule.target.authority.as_str())?);
    }
    debug!("proxy action applied, forwarding to {}", request.uri());
    Ok(())
}
