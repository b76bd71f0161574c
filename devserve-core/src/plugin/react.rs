use anyhow::{Context, Result};
use async_trait::async_trait;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Response};
use hyper::Body;
use serde::Deserialize;

use crate::plugin::Plugin;

pub const NAME: &str = "react";

const JS_CONTENT_TYPE: &str = "application/javascript";

/// UI-framework integration. Dev-time JSX/TSX modules load through plain
/// `<script type="module">` tags, so their responses must go out typed as
/// JavaScript regardless of the on-disk extension.
#[derive(Debug, Clone)]
pub struct React {
    extensions: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Options {
    #[serde(default = "default_extensions")]
    extensions: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    vec!["jsx".to_string(), "tsx".to_string()]
}

impl React {
    pub fn from_options(options: Option<&serde_json::Value>) -> Result<Self> {
        let extensions = match options {
            None => default_extensions(),
            Some(value) => {
                let options: Options = serde_json::from_value(value.clone())
                    .context("invalid react plugin options")?;
                options.extensions
            }
        };
        Ok(Self { extensions })
    }

    fn is_module_path(&self, path: &str) -> bool {
        match path.rsplit_once('.') {
            Some((_, extension)) => self.extensions.iter().any(|e| e == extension),
            None => false,
        }
    }
}

#[async_trait]
impl Plugin for React {
    fn name(&self) -> &str {
        NAME
    }

    async fn handle_response(
        &self,
        path: &str,
        mut response: Response<Body>,
    ) -> Result<Response<Body>> {
        if response.status().is_success() && self.is_module_path(path) {
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(JS_CONTENT_TYPE));
        }
        Ok(response)
    }
}
