use std::sync::Arc;

use sc_core::ports::{ItemSource, ItemStorePort, PayloadConsumer};
use sc_core::{ClipError, Locator};
use tracing::{info, warn};

/// Use case for streaming every item of a clipboard set to a consumer.
/// 将剪贴板集合中的所有条目按顺序交给消费者的用例。
///
/// Every locator is decoded and opened before the first byte reaches the
/// consumer, so a missing item never produces a partial batch. A failure while
/// streaming calls [`PayloadConsumer::discard`].
pub struct ReadClipboardSet {
    store: Arc<dyn ItemStorePort>,
}

impl ReadClipboardSet {
    pub fn new(store: Arc<dyn ItemStorePort>) -> Self {
        Self { store }
    }

    /// Returns the number of items delivered.
    #[tracing::instrument(
        name = "usecase.read_clipboard_set.execute",
        skip_all,
        fields(items = locators.len())
    )]
    pub async fn execute(
        &self,
        locators: &[String],
        consumer: &mut dyn PayloadConsumer,
    ) -> Result<usize, ClipError> {
        if locators.is_empty() {
            return Err(ClipError::ReadFailed {
                index: 0,
                reason: "clipboard set has no items".to_string(),
            });
        }

        let mut opened: Vec<(Locator, ItemSource)> = Vec::with_capacity(locators.len());
        for (index, raw) in locators.iter().enumerate() {
            let locator = Locator::decode(raw).map_err(|err| read_failed(index, err))?;
            let source = self
                .store
                .open_read(locator.token())
                .await
                .map_err(|err| read_failed(index, err))?;
            opened.push((locator, source));
        }

        for (index, (locator, mut source)) in opened.into_iter().enumerate() {
            if let Err(err) = consumer
                .read_from(index, locator.mime(), &mut *source)
                .await
            {
                warn!(index, error = %err, "Payload consumer failed, discarding batch");
                consumer.discard().await;
                return Err(ClipError::ReadFailed {
                    index,
                    reason: format!("{err:#}"),
                });
            }
        }

        info!(items = locators.len(), "Clipboard set read");
        Ok(locators.len())
    }
}

fn read_failed(index: usize, err: ClipError) -> ClipError {
    ClipError::ReadFailed {
        index,
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::BytesCollector;
    use async_trait::async_trait;
    use sc_core::{ItemToken, MimeType};
    use sc_infra::fs::FilesystemItemStore;
    use tempfile::TempDir;
    use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

    /// Accepts the first item, then fails.
    #[derive(Default)]
    struct FlakyConsumer {
        received: Vec<Vec<u8>>,
        discarded: bool,
    }

    #[async_trait]
    impl PayloadConsumer for FlakyConsumer {
        async fn read_from(
            &mut self,
            index: usize,
            _mime: &MimeType,
            source: &mut (dyn AsyncRead + Send + Unpin),
        ) -> anyhow::Result<()> {
            if index > 0 {
                anyhow::bail!("disk full");
            }
            let mut data = Vec::new();
            source.read_to_end(&mut data).await?;
            self.received.push(data);
            Ok(())
        }

        async fn discard(&mut self) {
            self.received.clear();
            self.discarded = true;
        }
    }

    async fn put(store: &FilesystemItemStore, mime: &str, data: &[u8]) -> String {
        let (token, mut sink) = store.begin_write().await.unwrap();
        sink.write_all(data).await.unwrap();
        sink.shutdown().await.unwrap();
        Locator::new(MimeType::from(mime), token).encode()
    }

    #[tokio::test]
    async fn delivers_items_in_order_with_mime() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FilesystemItemStore::new(dir.path()));
        let locators = vec![
            put(&store, "text/plain", b"first").await,
            put(&store, "image/png", b"second").await,
        ];

        let mut collector = BytesCollector::new();
        let count = ReadClipboardSet::new(store)
            .execute(&locators, &mut collector)
            .await
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(collector.items()[0], (MimeType::text_plain(), b"first".to_vec()));
        assert_eq!(collector.items()[1].0, MimeType::from("image/png"));
    }

    #[tokio::test]
    async fn missing_item_fails_before_consumer_sees_anything() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FilesystemItemStore::new(dir.path()));
        let present = put(&store, "text/plain", b"here").await;
        let missing = Locator::new(MimeType::text_plain(), ItemToken::new()).encode();

        let mut collector = BytesCollector::new();
        let err = ReadClipboardSet::new(store)
            .execute(&[present, missing], &mut collector)
            .await
            .unwrap_err();

        assert!(matches!(err, ClipError::ReadFailed { index: 1, .. }));
        assert!(collector.items().is_empty());
    }

    #[tokio::test]
    async fn malformed_locator_is_a_read_failure() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FilesystemItemStore::new(dir.path()));
        let mut collector = BytesCollector::new();
        let err = ReadClipboardSet::new(store)
            .execute(&["check/abc".to_string()], &mut collector)
            .await
            .unwrap_err();
        assert!(matches!(err, ClipError::ReadFailed { index: 0, .. }));
    }

    #[tokio::test]
    async fn consumer_failure_discards_partial_batch() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FilesystemItemStore::new(dir.path()));
        let locators = vec![
            put(&store, "text/plain", b"a").await,
            put(&store, "text/plain", b"b").await,
        ];

        let mut consumer = FlakyConsumer::default();
        let err = ReadClipboardSet::new(store)
            .execute(&locators, &mut consumer)
            .await
            .unwrap_err();

        assert!(matches!(err, ClipError::ReadFailed { index: 1, .. }));
        assert!(consumer.discarded);
        assert!(consumer.received.is_empty());
    }
}
