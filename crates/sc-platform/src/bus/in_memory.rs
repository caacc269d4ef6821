//! Process-local clipboard bus
//! 进程内剪切板总线

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use sc_core::ports::{BusContent, BusEvent, ClipboardBusPort};
use sc_core::ClipError;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Clipboard bus held in memory, shared by every component of one process.
/// 内存中的剪切板总线，同一进程内的组件共享。
///
/// Stands in for the host clipboard service wherever that service is not reachable,
/// and serves as the fake bus in tests. `set_available(false)` simulates a host
/// service that has gone away.
pub struct InMemoryClipboardBus {
    current: RwLock<Option<BusContent>>,
    events: broadcast::Sender<BusEvent>,
    available: AtomicBool,
}

impl InMemoryClipboardBus {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            current: RwLock::new(None),
            events,
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), ClipError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ClipError::BusUnavailable(
                "in-memory bus marked unavailable".to_string(),
            ))
        }
    }

    fn notify(&self, event: BusEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl Default for InMemoryClipboardBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClipboardBusPort for InMemoryClipboardBus {
    async fn set_current(&self, content: BusContent) -> Result<(), ClipError> {
        self.ensure_available()?;
        debug!(locators = content.locators.len(), "Bus content replaced");
        *self.current.write().await = Some(content);
        self.notify(BusEvent::Changed);
        Ok(())
    }

    async fn get_current(&self) -> Result<Option<BusContent>, ClipError> {
        self.ensure_available()?;
        Ok(self.current.read().await.clone())
    }

    async fn clear_current(&self) -> Result<(), ClipError> {
        self.ensure_available()?;
        *self.current.write().await = None;
        self.notify(BusEvent::Cleared);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<BusEvent> {
        self.events.subscribe()
    }
}
