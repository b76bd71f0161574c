//! Shared harness for the integration tests: an echo backend, a free-port
//! helper, and a devserve instance wired up from a YAML snippet.

use std::convert::TryInto;
use std::net::SocketAddr;
use std::time::Duration;

use hyper::header::HOST;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server};
use tokio::sync::oneshot::{channel, Sender};

use devserve_core::proxy::http::config::Config;
use devserve_core::proxy::http::server::HttpServer;
use devserve_core::raw_config::RawConfig;

/// Echo backend answering every request with `<path?query>|<host header>`,
/// so tests can assert on what actually arrived upstream.
pub async fn spawn_backend() -> SocketAddr {
    let make_svc = make_service_fn(|_conn| async {
        Ok::<_, hyper::Error>(service_fn(|request: Request<Body>| async move {
            let path = request
                .uri()
                .path_and_query()
                .map(|paq| paq.to_string())
                .unwrap_or_default();
            let host = request
                .headers()
                .get(HOST)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("")
                .to_string();
            Ok::<_, hyper::Error>(Response::new(Body::from(format!("{}|{}", path, host))))
        }))
    });

    let server = Server::bind(&"127.0.0.1:0".parse().unwrap()).serve(make_svc);
    let addr = server.local_addr();
    tokio::spawn(server);
    addr
}

/// Grabs a port the OS considers free right now. The listener is dropped
/// before the port is reused, which is good enough for test purposes.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Builds a [Config] from YAML and runs a devserve instance on its own task.
/// Returns the shutdown sender; dropping it also stops the server.
pub async fn spawn_devserve(yaml: &str) -> (u16, Sender<()>) {
    let config: Config = serde_yaml::from_str::<RawConfig>(yaml)
        .unwrap()
        .try_into()
        .unwrap();
    let port = config.server.port;
    let (tx, rx) = channel();
    tokio::spawn(async move {
        let mut server = HttpServer::new(config);
        server.serve(rx).await.unwrap();
    });
    wait_ready(port).await;
    (port, tx)
}

async fn wait_ready(port: u16) {
    for _ in 0..100u32 {
        if tokio::net::TcpStream::connect(("127.0.0.1", port))
            .await
            .is_ok()
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("dev server did not come up on port {}", port);
}

/// Reads a response body to a string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
