use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::ClipError;
use crate::ids::ItemToken;

/// Writable stream for one item, opened exclusively for that item.
pub type ItemSink = Box<dyn AsyncWrite + Send + Unpin>;

/// Read-only stream over one stored item.
pub type ItemSource = Box<dyn AsyncRead + Send + Unpin>;

/// Persistence of individual payload blobs, each named by its token.
///
/// All operations share one directory that is created lazily. Items are write-once:
/// nothing rewrites an item after its producer reported success.
#[async_trait]
pub trait ItemStorePort: Send + Sync {
    /// Create the item for `token` and open it for writing. Items are write-once:
    /// `Malformed` when the token already names an item.
    async fn open_write(&self, token: &ItemToken) -> Result<ItemSink, ClipError>;

    /// Allocate a fresh token and open its item for writing.
    async fn begin_write(&self) -> Result<(ItemToken, ItemSink), ClipError> {
        let token = ItemToken::new();
        let sink = self.open_write(&token).await?;
        Ok((token, sink))
    }

    /// Open the item for `token`. `ClipError::NotFound` if absent.
    async fn open_read(&self, token: &ItemToken) -> Result<ItemSource, ClipError>;

    /// Presence probe, no content read.
    async fn exists(&self, token: &ItemToken) -> Result<bool, ClipError>;

    /// Remove the item. Idempotent: `Ok(false)` when it was already gone.
    async fn delete(&self, token: &ItemToken) -> Result<bool, ClipError>;

    /// Remove every item whose token is not in `keep`; returns how many were removed.
    /// Items vanishing mid-scan are not errors.
    async fn delete_all_except(&self, keep: &HashSet<ItemToken>) -> Result<usize, ClipError>;

    /// Remove every item unconditionally.
    async fn clear(&self) -> Result<usize, ClipError>;
}

#[async_trait]
impl<T: ItemStorePort + ?Sized> ItemStorePort for Arc<T> {
    async fn open_write(&self, token: &ItemToken) -> Result<ItemSink, ClipError> {
        (**self).open_write(token).await
    }

    async fn begin_write(&self) -> Result<(ItemToken, ItemSink), ClipError> {
        (**self).begin_write().await
    }

    async fn open_read(&self, token: &ItemToken) -> Result<ItemSource, ClipError> {
        (**self).open_read(token).await
    }

    async fn exists(&self, token: &ItemToken) -> Result<bool, ClipError> {
        (**self).exists(token).await
    }

    async fn delete(&self, token: &ItemToken) -> Result<bool, ClipError> {
        (**self).delete(token).await
    }

    async fn delete_all_except(&self, keep: &HashSet<ItemToken>) -> Result<usize, ClipError> {
        (**self).delete_all_except(keep).await
    }

    async fn clear(&self) -> Result<usize, ClipError> {
        (**self).clear().await
    }
}
