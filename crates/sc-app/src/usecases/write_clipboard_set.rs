use std::sync::Arc;

use sc_core::ports::{ItemStorePort, PayloadProducer};
use sc_core::{ClipError, ClipboardSet, ItemToken, Locator};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Use case for persisting one ordered batch of payloads as a new clipboard set.
/// 将一组有序负载写入存储，生成新的剪贴板集合的用例。
///
/// All-or-nothing: when any producer fails every item written by this call is
/// removed again before the error is returned. Nothing is advertised here.
pub struct WriteClipboardSet {
    store: Arc<dyn ItemStorePort>,
}

impl WriteClipboardSet {
    pub fn new(store: Arc<dyn ItemStorePort>) -> Self {
        Self { store }
    }

    /// Write every payload in order and return the resulting set.
    ///
    /// # Errors
    /// - `EmptyInput` for an empty batch; the store is not touched.
    /// - `WriteFailed` when a producer fails or reports an empty mime.
    /// - `StoreUnavailable` when an item cannot be opened.
    ///
    /// Items written before any failure are removed again.
    #[tracing::instrument(
        name = "usecase.write_clipboard_set.execute",
        skip_all,
        fields(items = producers.len())
    )]
    pub async fn execute(
        &self,
        producers: &[Box<dyn PayloadProducer>],
    ) -> Result<ClipboardSet, ClipError> {
        if producers.is_empty() {
            return Err(ClipError::EmptyInput);
        }

        let mut written: Vec<Locator> = Vec::with_capacity(producers.len());

        for (index, producer) in producers.iter().enumerate() {
            let mime = producer.mime_type().clone();
            if mime.is_empty() {
                self.rollback(&written).await;
                return Err(ClipError::WriteFailed {
                    index,
                    reason: "empty mime type".to_string(),
                });
            }

            let (token, mut sink) = match self.store.begin_write().await {
                Ok(opened) => opened,
                Err(err) => {
                    self.rollback(&written).await;
                    return Err(err);
                }
            };

            let outcome = async {
                producer.write_to(&mut *sink).await?;
                sink.shutdown().await?;
                anyhow::Ok(())
            }
            .await;
            drop(sink);

            // The failing item was already created, so it is rolled back too.
            written.push(Locator::new(mime, token));

            if let Err(err) = outcome {
                warn!(index, error = %err, "Payload producer failed, rolling back");
                self.rollback(&written).await;
                return Err(ClipError::WriteFailed {
                    index,
                    reason: format!("{err:#}"),
                });
            }
            debug!(index, "Item written");
        }

        info!(items = written.len(), "Clipboard set written");
        Ok(ClipboardSet::from_locators(written))
    }

    /// Best-effort removal of the given items; failures are logged and skipped.
    pub(crate) async fn rollback(&self, locators: &[Locator]) {
        let tokens: Vec<&ItemToken> = locators.iter().map(Locator::token).collect();
        rollback_tokens(self.store.as_ref(), tokens).await;
    }
}

pub(crate) async fn rollback_tokens<'a>(
    store: &dyn ItemStorePort,
    tokens: impl IntoIterator<Item = &'a ItemToken>,
) {
    for token in tokens {
        if let Err(err) = store.delete(token).await {
            warn!(token = %token, error = %err, "Failed to roll back item");
        }
    }
}
