use std::collections::HashMap;
use std::convert::{TryFrom, TryInto};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use anyhow::{anyhow, Error};
use http::uri::Uri;
use serde::{Deserialize, Serialize};

use crate::handler::http::action::PrefixRewrite;
use crate::handler::http::rule::{Rule, Target};
use crate::handler::http::selector::AllowedHosts;
use crate::plugin;
use crate::proxy::http::config::{Config, FsConfig, ServerConfig};
use crate::resolve::AliasResolver;

pub const DEFAULT_PORT: u16 = 3000;

/// RawConfig is the serde-facing shape of the config file. Everything is
/// optional here; defaults and validation are applied by the conversion
/// into [Config].
#[derive(Debug, PartialEq, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)] // To prevent typos.
pub struct RawConfig {
    pub root: Option<PathBuf>,
    pub server: Option<RawServer>,
    pub resolve: Option<RawResolve>,
    pub plugins: Option<Vec<RawPlugin>>,
    pub proxy: Option<Vec<RawProxyRule>>,
}

#[derive(Debug, Eq, PartialEq, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawServer {
    /// Bind address; `localhost` or an IP literal.
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Hostnames (or wildcard patterns) accepted in the request `Host`
    /// header. Loopback names are always accepted.
    pub allowed_hosts: Option<Vec<String>>,
}

#[derive(Debug, Eq, PartialEq, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawResolve {
    /// Symbolic import prefix -> absolute directory.
    pub alias: Option<HashMap<String, PathBuf>>,
}

#[derive(Debug, PartialEq, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawPlugin {
    pub name: String,
    /// Free-form options interpreted by the named plugin.
    pub options: Option<serde_json::Value>,
}

#[derive(Debug, Eq, PartialEq, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawProxyRule {
    pub prefix: String,
    /// Origin URL, scheme + host + port only.
    pub target: String,
    pub change_origin: Option<bool>,
    pub rewrite: Option<RawRewrite>,
}

#[derive(Debug, Eq, PartialEq, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawRewrite {
    pub from: String,
    pub to: String,
}

impl TryFrom<RawConfig> for Config {
    type Error = Error;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let server = raw.server.unwrap_or_default().try_into()?;

        let mut rules = raw
            .proxy
            .unwrap_or_default()
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Rule>, Self::Error>>()?;
        for (index, rule) in rules.iter().enumerate() {
            if rules[..index].iter().any(|seen| seen.prefix == rule.prefix) {
                return Err(anyhow!("duplicate proxy prefix: {}", rule.prefix));
            }
        }
        // Longest prefix first, so `/api/public` can never be shadowed by
        // `/api`. The sort is stable; declaration order breaks length ties.
        rules.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));

        let plugins = raw
            .plugins
            .unwrap_or_default()
            .iter()
            .map(|raw| plugin::build(&raw.name, raw.options.as_ref()))
            .collect::<Result<Vec<_>, Self::Error>>()?;

        Ok(Config {
            server,
            rules,
            fs: FsConfig {
                root: raw.root.unwrap_or_else(|| PathBuf::from(".")),
                resolver: raw.resolve.unwrap_or_default().try_into()?,
            },
            plugins,
        })
    }
}

impl TryFrom<RawServer> for ServerConfig {
    type Error = Error;

    fn try_from(raw: RawServer) -> Result<Self, Self::Error> {
        let host = match raw.host.as_deref() {
            None | Some("localhost") => IpAddr::V4(Ipv4Addr::LOCALHOST),
            Some(other) => other
                .parse()
                .map_err(|_| anyhow!("invalid bind host: {}", other))?,
        };
        Ok(ServerConfig {
            host,
            port: raw.port.unwrap_or(DEFAULT_PORT),
            allowed_hosts: AllowedHosts::new(raw.allowed_hosts.unwrap_or_default()),
        })
    }
}

impl TryFrom<RawResolve> for AliasResolver {
    type Error = Error;

    fn try_from(raw: RawResolve) -> Result<Self, Self::Error> {
        let alias = raw.alias.unwrap_or_default();
        let mut entries = Vec::with_capacity(alias.len());
        for (token, dir) in alias {
            if token.is_empty() || token.contains('/') {
                return Err(anyhow!("invalid alias token: {:?}", token));
            }
            if !dir.is_absolute() {
                return Err(anyhow!(
                    "alias {:?} must map to an absolute directory, got {:?}",
                    token,
                    dir
                ));
            }
            entries.push((token, dir));
        }
        Ok(AliasResolver::new(entries))
    }
}

impl TryFrom<RawProxyRule> for Rule {
    type Error = Error;

    fn try_from(raw: RawProxyRule) -> Result<Self, Self::Error> {
        if !raw.prefix.starts_with('/') {
            return Err(anyhow!("proxy prefix must start with '/': {}", raw.prefix));
        }
        Ok(Rule {
            target: parse_origin(&raw.target)?,
            prefix: raw.prefix,
            change_origin: raw.change_origin.unwrap_or(false),
            rewrite: raw.rewrite.map(TryInto::try_into).transpose()?,
        })
    }
}

impl TryFrom<RawRewrite> for PrefixRewrite {
    type Error = Error;

    fn try_from(raw: RawRewrite) -> Result<Self, Self::Error> {
        if !raw.from.starts_with('/') || !raw.to.starts_with('/') {
            return Err(anyhow!(
                "rewrite prefixes must start with '/': {} -> {}",
                raw.from,
                raw.to
            ));
        }
        Ok(PrefixRewrite {
            from: raw.from,
            to: raw.to,
        })
    }
}

/// parse_origin accepts `scheme://host[:port]` and nothing more; a target
/// with a path or query is almost always a misconfigured rewrite.
pub(crate) fn parse_origin(target: &str) -> Result<Target, Error> {
    let uri: Uri = target.parse()?;
    let scheme = uri
        .scheme()
        .cloned()
        .ok_or_else(|| anyhow!("proxy target must carry a scheme: {}", target))?;
    if scheme.as_str() != "http" && scheme.as_str() != "https" {
        return Err(anyhow!("unsupported proxy target scheme: {}", scheme));
    }
    let authority = uri
        .authority()
        .cloned()
        .ok_or_else(|| anyhow!("proxy target must carry a host: {}", target))?;
    if !uri.path().is_empty() && uri.path() != "/" {
        return Err(anyhow!(
            "proxy target must be a bare origin, got path {:?}: {}",
            uri.path(),
            target
        ));
    }
    if uri.query().is_some() {
        return Err(anyhow!("proxy target must not carry a query: {}", target));
    }
    Ok(Target { scheme, authority })
}
