//! Use case for starting the clipboard watcher
//! 启动剪贴板监控器的用例

use std::sync::Arc;

use sc_core::ports::ClipboardBusPort;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};

use super::Reconciler;

/// Use case for starting the clipboard watcher.
///
/// ## Behavior / 行为
/// - Runs one liveness check right away, then one per bus change notification
/// - A lagging receiver still triggers a check; missed events are not replayed
///
/// ## English
/// Keeps the item store consistent with the bus for as long as the returned
/// handle lives. Dropping the handle stops the watcher.
pub struct StartClipboardWatcher {
    reconciler: Arc<Reconciler>,
    bus: Arc<dyn ClipboardBusPort>,
}

impl StartClipboardWatcher {
    pub fn new(reconciler: Arc<Reconciler>, bus: Arc<dyn ClipboardBusPort>) -> Self {
        Self { reconciler, bus }
    }

    /// Spawn the watcher on the current tokio runtime.
    pub fn execute(&self) -> WatcherHandle {
        let span = info_span!("usecase.start_clipboard_watcher.execute");
        // Subscribe before the first check so no change slips in between.
        let mut events = self.bus.subscribe();
        let reconciler = self.reconciler.clone();

        let task = tokio::spawn(
            async move {
                info!("Clipboard watcher started");
                reconciler.check_live().await;

                loop {
                    match events.recv().await {
                        Ok(event) => {
                            debug!(?event, "Bus changed");
                            reconciler.check_live().await;
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "Watcher lagged behind bus events");
                            reconciler.check_live().await;
                        }
                        Err(RecvError::Closed) => {
                            info!("Bus closed, clipboard watcher stopping");
                            break;
                        }
                    }
                }
            }
            .instrument(span),
        );

        WatcherHandle { task: Some(task) }
    }
}

/// Owns the watcher task. Aborts it on drop.
#[derive(Debug)]
pub struct WatcherHandle {
    task: Option<JoinHandle<()>>,
}

impl WatcherHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the watcher and wait for it to wind down.
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
