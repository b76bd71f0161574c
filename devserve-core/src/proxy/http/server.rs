use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use anyhow::Result;
use derivative::Derivative;
use http::header::HOST;
use http::StatusCode;
use hyper::client::HttpConnector;
use hyper::server::conn::Http;
use hyper::service::Service;
use hyper::{Body, Client, Request, Response};
use tokio::net::TcpListener;
use tokio::select;
use tokio::sync::oneshot::Receiver;
use tracing::{debug, error, info};

use crate::handler::http::action::apply_proxy_action;
use crate::handler::http::rule::Rule;
use crate::handler::http::selector::select_rule;
use crate::proxy::http::config::Config;
use crate::proxy::http::static_files;

/// HttpServer owns the accept loop. Each accepted connection is served by a
/// cloned [HttpService] on its own task until the shutdown receiver fires.
pub struct HttpServer {
    config: Arc<Config>,
}

impl HttpServer {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub async fn serve(&mut self, mut rx: Receiver<()>) -> Result<()> {
        let addr = SocketAddr::new(self.config.server.host, self.config.server.port);
        let listener = TcpListener::bind(addr).await?;
        info!("dev server listening on http://{}", listener.local_addr()?);
        let service = HttpService::new(self.config.clone());
        let rx_mut = &mut rx;

        loop {
            let (stream, addr_remote) = select! {
                conn = listener.accept() => conn?,
                _ = &mut *rx_mut => {
                    return Ok(());
                }
            };
            debug!("accepted connection from {}", addr_remote);
            let service = service.clone();
            tokio::spawn(async move {
                if let Err(e) = Http::new().serve_connection(stream, service).await {
                    debug!("connection closed with error: {}", e);
                }
            });
        }
    }
}

/// HttpService resolves a single request: host allow-list first, then proxy
/// dispatch, then module serving for everything the rules leave alone.
#[derive(Derivative)]
#[derivative(Debug)]
#[derive(Clone)]
pub struct HttpService {
    config: Arc<Config>,

    #[derivative(Debug = "ignore")]
    client: Client<HttpConnector>,
}

impl HttpService {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    async fn handle(self, request: Request<Body>) -> Result<Response<Body>> {
        let host = request
            .headers()
            .get(HOST)
            .and_then(|value| value.to_str().ok());
        match host {
            Some(name) if self.config.server.allowed_hosts.permits(name) => {}
            _ => {
                debug!("rejected request with host {:?}", host);
                return Ok(Response::builder()
                    .status(StatusCode::FORBIDDEN)
                    .body(Body::from("host not allowed"))?);
            }
        }

        match select_rule(&self.config.rules, request.uri().path()) {
            Some(rule) => self.forward(rule, request).await,
            None => self.serve_module(request).await,
        }
    }

    async fn forward(&self, rule: &Rule, mut request: Request<Body>) -> Result<Response<Body>> {
        apply_proxy_action(rule, &mut request)?;
        match self.client.request(request).await {
            Ok(response) => Ok(response),
            Err(err) => {
                error!("failed to reach {}: {}", rule.target, err);
                Ok(Response::builder()
                    .status(StatusCode::BAD_GATEWAY)
                    .body(Body::empty())?)
            }
        }
    }

    async fn serve_module(&self, mut request: Request<Body>) -> Result<Response<Body>> {
        for plugin in &self.config.plugins {
            request = plugin.handle_request(request).await?;
        }
        let path = request.uri().path().to_string();
        let mut response = static_files::serve(&self.config.fs, request.method(), &path).await?;
        for plugin in &self.config.plugins {
            response = plugin.handle_response(&path, response).await?;
        }
        Ok(response)
    }
}

impl Service<Request<Body>> for HttpService {
    type Response = Response<Body>;
    type Error = anyhow::Error;
    #[allow(clippy::type_complexity)]
    type Future =
        Pin<Box<dyn 'static + Send + Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    #[inline]
    fn call(&mut self, request: Request<Body>) -> Self::Future {
        Box::pin(self.clone().handle(request))
    }
}
