use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::clipboard::MimeType;

/// Streams one payload into a store sink. Write-all-or-fail: any error means the
/// sink content is garbage and the caller rolls the item back.
#[async_trait]
pub trait PayloadProducer: Send + Sync {
    fn mime_type(&self) -> &MimeType;

    async fn write_to(&self, sink: &mut (dyn AsyncWrite + Send + Unpin)) -> anyhow::Result<()>;
}

/// Receives payloads of a read batch, one call per position, in order.
#[async_trait]
pub trait PayloadConsumer: Send {
    async fn read_from(
        &mut self,
        index: usize,
        mime: &MimeType,
        source: &mut (dyn AsyncRead + Send + Unpin),
    ) -> anyhow::Result<()>;

    /// Drop whatever earlier calls of this batch produced.
    async fn discard(&mut self) {}
}
