use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::clipboard::ClipDescription;
use crate::error::ClipError;

/// What the bus holds: a small description plus opaque locator strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusContent {
    pub description: ClipDescription,
    pub locators: Vec<String>,
}

/// Change notification published by the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Changed,
    Cleared,
}

/// The host's system-wide clipboard service.
///
/// It is the source of truth for which locators are still referenced. The store
/// never learns about references any other way.
#[async_trait]
pub trait ClipboardBusPort: Send + Sync {
    async fn set_current(&self, content: BusContent) -> Result<(), ClipError>;

    /// `Ok(None)` when the bus holds nothing.
    async fn get_current(&self) -> Result<Option<BusContent>, ClipError>;

    async fn clear_current(&self) -> Result<(), ClipError>;

    fn subscribe(&self) -> broadcast::Receiver<BusEvent>;
}
