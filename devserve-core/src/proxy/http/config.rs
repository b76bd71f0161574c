use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::handler::http::rule::Rule;
use crate::handler::http::selector::AllowedHosts;
use crate::plugin::Plugin;
use crate::resolve::AliasResolver;

/// Fully validated runtime configuration. Built once at startup from
/// [crate::raw_config::RawConfig] and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Sorted longest-prefix-first; see [crate::handler::http::selector::select_rule].
    pub rules: Vec<Rule>,
    pub fs: FsConfig,
    /// Applied in declared order to the module-serving pipeline.
    pub plugins: Vec<Arc<dyn Plugin>>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub allowed_hosts: AllowedHosts,
}

#[derive(Debug, Clone)]
pub struct FsConfig {
    /// Directory module and asset requests are served from.
    pub root: PathBuf,
    pub resolver: AliasResolver,
}
