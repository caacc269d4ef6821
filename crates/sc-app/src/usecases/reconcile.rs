//! Keeps the item store in step with what the bus references.
//!
//! Two sides:
//! - `publish` advertises a new set and then drops every item it does not name.
//! - `check_live` verifies the bus still points at existing items and clears the
//!   store when it does not. It never deletes unreferenced extras, because an
//!   in-flight write of this process may own them.

use std::sync::Arc;

use sc_core::ports::{BusContent, ClipboardBusPort, ItemStorePort};
use sc_core::{ClipError, ClipboardSet, Locator, MimeType};
use tracing::{debug, info, warn};

/// Result of a liveness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveCheck {
    /// Every advertised item exists.
    Consistent { items: usize },
    /// The store was wiped; `removed` items were deleted.
    Cleared { reason: String, removed: usize },
}

impl LiveCheck {
    pub fn is_consistent(&self) -> bool {
        matches!(self, LiveCheck::Consistent { .. })
    }
}

pub struct Reconciler {
    store: Arc<dyn ItemStorePort>,
    bus: Arc<dyn ClipboardBusPort>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn ItemStorePort>, bus: Arc<dyn ClipboardBusPort>) -> Self {
        Self { store, bus }
    }

    /// Advertise `set` on the bus, then delete every item outside it.
    ///
    /// A bus failure is returned before anything is deleted. A failing sweep is
    /// only logged: the set is already live and the next publish retries.
    #[tracing::instrument(name = "usecase.reconcile.publish", skip_all, fields(items = set.len()))]
    pub async fn publish(&self, set: &ClipboardSet) -> Result<usize, ClipError> {
        self.bus
            .set_current(BusContent {
                description: set.description().clone(),
                locators: set.encoded_locators(),
            })
            .await?;

        match self.store.delete_all_except(&set.tokens()).await {
            Ok(removed) => {
                info!(removed, "Published clipboard set and swept stale items");
                Ok(removed)
            }
            Err(err) => {
                warn!(error = %err, "Stale item sweep failed after publish");
                Ok(0)
            }
        }
    }

    /// Verify that the bus still references only existing items; clear the
    /// store otherwise. Never fails.
    #[tracing::instrument(name = "usecase.reconcile.check_live", skip_all)]
    pub async fn check_live(&self) -> LiveCheck {
        let content = match self.bus.get_current().await {
            Ok(Some(content)) => content,
            Ok(None) => return self.clear("bus holds no clipboard set").await,
            Err(err) => return self.clear(&format!("bus unreadable: {err}")).await,
        };

        if content.locators.is_empty() {
            return self.clear("bus holds an empty clipboard set").await;
        }

        for raw in &content.locators {
            let locator = match Locator::decode(raw) {
                Ok(locator) => locator,
                Err(_) => return self.clear(&format!("foreign locator on bus: {raw}")).await,
            };
            match self.store.exists(locator.token()).await {
                Ok(true) => {}
                Ok(false) => {
                    return self
                        .clear(&format!("advertised item missing: {}", locator.token()))
                        .await
                }
                Err(err) => return self.clear(&format!("item probe failed: {err}")).await,
            }
        }

        debug!(items = content.locators.len(), "Clipboard set is consistent");
        LiveCheck::Consistent {
            items: content.locators.len(),
        }
    }

    /// Whether `locator` names an existing item, optionally of `mime_filter`.
    pub async fn is_available(&self, mime_filter: Option<&MimeType>, locator: &Locator) -> bool {
        if let Some(filter) = mime_filter {
            if locator.mime() != filter {
                return false;
            }
        }
        self.store.exists(locator.token()).await.unwrap_or(false)
    }

    async fn clear(&self, reason: &str) -> LiveCheck {
        let removed = match self.store.clear().await {
            Ok(removed) => removed,
            Err(err) => {
                warn!(error = %err, "Failed to clear item store");
                0
            }
        };
        info!(reason, removed, "Item store cleared");
        LiveCheck::Cleared {
            reason: reason.to_string(),
            removed,
        }
    }
}
