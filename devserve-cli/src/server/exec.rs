use anyhow::Error;
use devserve_core::proxy::http::config::Config;
use devserve_core::proxy::http::server::HttpServer;
use tokio::sync::oneshot::{channel, Sender};
use tokio::task::JoinHandle;
use tracing::info;

/// Server runs the accept loop on its own task and shuts it down through a
/// oneshot channel.
#[derive(Debug)]
pub struct Server {
    sender: Option<Sender<()>>,
    task: Option<JoinHandle<Result<(), Error>>>,
}

impl Server {
    pub fn start(config: Config) -> Self {
        info!("starting dev server task");
        let (sender, rx) = channel();
        let task = tokio::spawn(async move {
            let mut server = HttpServer::new(config);
            server.serve(rx).await
        });
        Self {
            sender: Some(sender),
            task: Some(task),
        }
    }

    pub async fn stop(&mut self) -> anyhow::Result<()> {
        info!("stopping dev server task");
        if let Some(sender) = self.sender.take() {
            let _ = sender.send(());
        }
        if let Some(task) = self.task.take() {
            task.await??;
        }
        Ok(())
    }
}
