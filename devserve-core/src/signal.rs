use anyhow::Result;
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Signals bundles several unix signal streams and resolves when any one of
/// them fires.
pub struct Signals {
    streams: Vec<Signal>,
}

impl Signals {
    pub fn from_kinds(kinds: &[SignalKind]) -> Result<Self> {
        let streams = kinds
            .iter()
            .map(|kind| signal(*kind).map_err(Into::into))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { streams })
    }

    pub async fn wait(&mut self) -> Result<()> {
        let pending = self
            .streams
            .iter_mut()
            .map(|stream| Box::pin(stream.recv()));
        futures::future::select_all(pending).await;
        Ok(())
    }
}
