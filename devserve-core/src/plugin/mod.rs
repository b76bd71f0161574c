use std::fmt::Debug;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use http::{Request, Response};
use hyper::Body;

pub mod react;

use self::react::React;

/// Plugin hooks wrap the module-serving pipeline in the order the plugins
/// are declared. Proxied traffic never reaches them.
#[async_trait]
pub trait Plugin: Send + Sync + Debug {
    fn name(&self) -> &str;

    async fn handle_request(&self, request: Request<Body>) -> Result<Request<Body>> {
        Ok(request)
    }

    async fn handle_response(
        &self,
        _path: &str,
        response: Response<Body>,
    ) -> Result<Response<Body>> {
        Ok(response)
    }
}

/// build resolves a configured plugin descriptor to its implementation.
/// Unknown names are a configuration error, caught at startup.
pub fn build(name: &str, options: Option<&serde_json::Value>) -> Result<Arc<dyn Plugin>> {
    match name {
        react::NAME => Ok(Arc::new(React::from_options(options)?)),
        other => Err(anyhow!("unknown plugin: {}", other)),
    }
}
