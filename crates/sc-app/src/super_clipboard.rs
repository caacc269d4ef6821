//! SuperClipboard facade
//! 超级剪贴板门面
//!
//! Ties the write/read transactions and the reconciler to one clipboard bus and
//! offers typed helpers for files and serde objects.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use sc_core::ports::{ClipboardBusPort, ItemStorePort, PayloadConsumer, PayloadProducer};
use sc_core::{
    ClipError, ClipboardGeneration, ClipboardSet, GenerationEvent, Locator, MimeType,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::payload::{DirectoryTarget, FileTarget, ObjectCodec, ObjectCollector, OutboundPayload};
use crate::usecases::write_clipboard_set::rollback_tokens;
use crate::usecases::{
    LiveCheck, ReadClipboardSet, Reconciler, StartClipboardWatcher, WatcherHandle,
    WriteClipboardSet,
};

pub struct SuperClipboard {
    store: Arc<dyn ItemStorePort>,
    bus: Arc<dyn ClipboardBusPort>,
    writer: WriteClipboardSet,
    reader: ReadClipboardSet,
    reconciler: Arc<Reconciler>,
    codec: ObjectCodec,
    generation: Mutex<Option<ClipboardGeneration>>,
    next_generation: AtomicU64,
}

impl SuperClipboard {
    pub fn new(store: Arc<dyn ItemStorePort>, bus: Arc<dyn ClipboardBusPort>) -> Self {
        Self {
            writer: WriteClipboardSet::new(store.clone()),
            reader: ReadClipboardSet::new(store.clone()),
            reconciler: Arc::new(Reconciler::new(store.clone(), bus.clone())),
            store,
            bus,
            codec: ObjectCodec::default(),
            generation: Mutex::new(None),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Codec used by the object helpers on both sides.
    pub fn with_object_codec(mut self, codec: ObjectCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Application-defined mime label, `vnd.superclip.cursor.item/<subtype>`.
    pub fn custom_mime(subtype: &str) -> MimeType {
        MimeType::custom(subtype)
    }

    pub fn reconciler(&self) -> Arc<Reconciler> {
        self.reconciler.clone()
    }

    /// Generation last written by this process, if any.
    pub fn current_generation(&self) -> Option<ClipboardGeneration> {
        *self.lock_generation()
    }

    /// Start reconciling on every bus change until the handle is dropped.
    pub fn watch(&self) -> WatcherHandle {
        StartClipboardWatcher::new(self.reconciler.clone(), self.bus.clone()).execute()
    }

    /// Write the payloads, advertise them and sweep everything older.
    ///
    /// On failure nothing new stays on disk and the previous set is untouched.
    #[tracing::instrument(name = "super_clipboard.set_primary_clip", skip_all)]
    pub async fn set_primary_clip(
        &self,
        producers: Vec<Box<dyn PayloadProducer>>,
    ) -> Result<ClipboardSet, ClipError> {
        let number = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let mut generation = ClipboardGeneration::new(number);
        advance(&mut generation, GenerationEvent::BeginWrite);

        let set = match self.writer.execute(&producers).await {
            Ok(set) => set,
            Err(err) => {
                advance(&mut generation, GenerationEvent::WriteAborted);
                return Err(err);
            }
        };

        if let Err(err) = self.reconciler.publish(&set).await {
            warn!(error = %err, "Bus rejected clipboard set, rolling back");
            rollback_tokens(self.store.as_ref(), set.locators().iter().map(Locator::token)).await;
            advance(&mut generation, GenerationEvent::WriteAborted);
            return Err(err);
        }

        advance(&mut generation, GenerationEvent::Published);
        {
            let mut current = self.lock_generation();
            if let Some(previous) = current.as_mut() {
                advance(previous, GenerationEvent::Superseded);
            }
            *current = Some(generation);
        }
        info!(generation = number, items = set.len(), "Primary clip set");
        Ok(set)
    }

    /// Every item gets the same `mime`.
    pub async fn set_primary_clip_objects<T>(
        &self,
        mime: MimeType,
        items: Vec<T>,
    ) -> Result<ClipboardSet, ClipError>
    where
        T: Serialize + Send + Sync + 'static,
    {
        let producers = items
            .into_iter()
            .map(|item| self.object_producer(mime.clone(), item))
            .collect();
        self.set_primary_clip(producers).await
    }

    /// One mime per item; the two lists must have the same non-zero length.
    pub async fn set_primary_clip_objects_with_mimes<T>(
        &self,
        mimes: Vec<MimeType>,
        items: Vec<T>,
    ) -> Result<ClipboardSet, ClipError>
    where
        T: Serialize + Send + Sync + 'static,
    {
        if mimes.len() != items.len() {
            return Err(ClipError::EmptyInput);
        }
        let producers = mimes
            .into_iter()
            .zip(items)
            .map(|(mime, item)| self.object_producer(mime, item))
            .collect();
        self.set_primary_clip(producers).await
    }

    pub async fn set_primary_clip_files(
        &self,
        mime: MimeType,
        files: Vec<PathBuf>,
    ) -> Result<ClipboardSet, ClipError> {
        let producers = files
            .into_iter()
            .map(|path| file_producer(mime.clone(), path))
            .collect();
        self.set_primary_clip(producers).await
    }

    pub async fn set_primary_clip_files_with_mimes(
        &self,
        mimes: Vec<MimeType>,
        files: Vec<PathBuf>,
    ) -> Result<ClipboardSet, ClipError> {
        if mimes.len() != files.len() {
            return Err(ClipError::EmptyInput);
        }
        let producers = mimes
            .into_iter()
            .zip(files)
            .map(|(mime, path)| file_producer(mime, path))
            .collect();
        self.set_primary_clip(producers).await
    }

    /// Wipe the store and the bus. Returns how many items were removed.
    #[tracing::instrument(name = "super_clipboard.clear_primary_clip", skip_all)]
    pub async fn clear_primary_clip(&self) -> Result<usize, ClipError> {
        let removed = self.store.clear().await?;
        self.bus.clear_current().await?;
        self.mark_cleared();
        info!(removed, "Primary clip cleared");
        Ok(removed)
    }

    /// Stream the current set into `consumer`. Returns the number of items read.
    #[tracing::instrument(name = "super_clipboard.get_primary_clip", skip_all)]
    pub async fn get_primary_clip(
        &self,
        consumer: &mut dyn PayloadConsumer,
    ) -> Result<usize, ClipError> {
        let content = self
            .bus
            .get_current()
            .await
            .map_err(|err| ClipError::ReadFailed {
                index: 0,
                reason: format!("clipboard unavailable: {err}"),
            })?
            .ok_or_else(|| ClipError::ReadFailed {
                index: 0,
                reason: "clipboard is empty".to_string(),
            })?;
        self.reader.execute(&content.locators, consumer).await
    }

    /// First item of the current set, decoded.
    pub async fn get_primary_clip_object<T>(&self) -> Result<T, ClipError>
    where
        T: DeserializeOwned + Send,
    {
        self.get_primary_clip_objects::<T>()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ClipError::ReadFailed {
                index: 0,
                reason: "clipboard set has no items".to_string(),
            })
    }

    pub async fn get_primary_clip_objects<T>(&self) -> Result<Vec<T>, ClipError>
    where
        T: DeserializeOwned + Send,
    {
        let mut collector = ObjectCollector::<T>::new(self.codec);
        self.get_primary_clip(&mut collector).await?;
        Ok(collector.into_items())
    }

    /// Copy the current set into `target`; with several items the last one wins.
    pub async fn get_primary_clip_file(&self, target: impl AsRef<Path>) -> Result<(), ClipError> {
        let mut sink = FileTarget::new(target.as_ref());
        self.get_primary_clip(&mut sink).await?;
        Ok(())
    }

    /// Copy every item into its own file inside `dir`.
    pub async fn get_primary_clip_files(
        &self,
        dir: impl AsRef<Path>,
    ) -> Result<Vec<PathBuf>, ClipError> {
        let mut sink = DirectoryTarget::new(dir.as_ref());
        self.get_primary_clip(&mut sink).await?;
        Ok(sink.into_items())
    }

    /// Whether the bus advertises `mime`. With `check_data`, at least one item of
    /// that mime must also exist in the store.
    pub async fn contains(&self, mime: &MimeType, check_data: bool) -> bool {
        let content = match self.bus.get_current().await {
            Ok(Some(content)) => content,
            Ok(None) => return false,
            Err(err) => {
                debug!(error = %err, "Bus unreadable");
                return false;
            }
        };
        if !content.description.has_mime_type(mime) {
            return false;
        }
        if !check_data {
            return true;
        }

        for raw in &content.locators {
            if let Ok(locator) = Locator::decode(raw) {
                if self.reconciler.is_available(Some(mime), &locator).await {
                    return true;
                }
            }
        }
        false
    }

    /// Clear the store when the bus no longer points at it.
    pub async fn check(&self) -> LiveCheck {
        let outcome = self.reconciler.check_live().await;
        if !outcome.is_consistent() {
            self.mark_cleared();
        }
        outcome
    }

    /// Mime label of a well-formed item locator.
    pub fn mime_type_of(&self, locator: &str) -> Option<MimeType> {
        Locator::decode(locator)
            .ok()
            .map(|locator| locator.into_parts().0)
    }

    fn object_producer<T>(&self, mime: MimeType, item: T) -> Box<dyn PayloadProducer>
    where
        T: Serialize + Send + Sync + 'static,
    {
        Box::new(OutboundPayload::object(mime, item, self.codec))
    }

    fn mark_cleared(&self) {
        if let Some(current) = self.lock_generation().as_mut() {
            advance(current, GenerationEvent::Cleared);
        }
    }

    fn lock_generation(&self) -> std::sync::MutexGuard<'_, Option<ClipboardGeneration>> {
        self.generation
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn file_producer(mime: MimeType, path: PathBuf) -> Box<dyn PayloadProducer> {
    Box::new(OutboundPayload::file(mime, path))
}

fn advance(generation: &mut ClipboardGeneration, event: GenerationEvent) {
    if let Err(err) = generation.apply(event) {
        debug!(generation = generation.number, error = %err, "Generation transition ignored");
    }
}
