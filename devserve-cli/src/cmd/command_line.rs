use std::convert::TryInto;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use devserve_core::proxy::http::config::Config;
use devserve_core::raw_config::RawConfig;
use structopt::StructOpt;
use tokio::fs::read_to_string;
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "devserve",
    about = "Front-end development server with API proxying."
)]
pub struct Opt {
    /// path of the config file; omit it to serve the current directory with
    /// defaults
    #[structopt(name = "FILE", parse(from_os_str))]
    pub input: Option<PathBuf>,

    // The number of occurrences of the `v/verbose` flag
    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: u8,
}

impl Opt {
    pub fn get_level_filter(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    pub fn from_args_checked() -> Result<Self> {
        Self::from_args_safe()?.checked()
    }

    fn checked(self) -> Result<Self> {
        if let Some(path) = &self.input {
            match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") | Some("yaml") | Some("yml") => {}
                _ => {
                    return Err(anyhow!(
                        "config file must end in .yaml, .yml or .json, use `-h | --help` for more details"
                    ))
                }
            }
        }
        Ok(self)
    }
}

pub async fn get_config_from_opt(opt: &Opt) -> Result<Config> {
    match opt.input {
        None => RawConfig::default(),
        Some(ref path_buf) => {
            let buffer = read_to_string(path_buf).await?;
            match path_buf.extension().and_then(|ext| ext.to_str()) {
                Some("json") => serde_json::from_str(&buffer)?,
                Some("yaml") | Some("yml") => serde_yaml::from_str(&buffer)?,
                _ => return Err(anyhow!("invalid file extension")),
            }
        }
    }
    .try_into()
}
