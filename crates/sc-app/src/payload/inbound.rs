use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use sc_core::ports::PayloadConsumer;
use sc_core::MimeType;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tracing::warn;

use super::ObjectCodec;

/// Collects every item as raw bytes.
#[derive(Debug, Default)]
pub struct BytesCollector {
    items: Vec<(MimeType, Vec<u8>)>,
}

impl BytesCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[(MimeType, Vec<u8>)] {
        &self.items
    }

    pub fn into_items(self) -> Vec<(MimeType, Vec<u8>)> {
        self.items
    }
}

#[async_trait]
impl PayloadConsumer for BytesCollector {
    async fn read_from(
        &mut self,
        _index: usize,
        mime: &MimeType,
        source: &mut (dyn AsyncRead + Send + Unpin),
    ) -> anyhow::Result<()> {
        let mut data = Vec::new();
        source.read_to_end(&mut data).await?;
        self.items.push((mime.clone(), data));
        Ok(())
    }

    async fn discard(&mut self) {
        self.items.clear();
    }
}

/// Decodes every item into a `T`.
#[derive(Debug)]
pub struct ObjectCollector<T> {
    codec: ObjectCodec,
    items: Vec<T>,
}

impl<T> ObjectCollector<T> {
    pub fn new(codec: ObjectCodec) -> Self {
        Self {
            codec,
            items: Vec::new(),
        }
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

#[async_trait]
impl<T: DeserializeOwned + Send> PayloadConsumer for ObjectCollector<T> {
    async fn read_from(
        &mut self,
        index: usize,
        _mime: &MimeType,
        source: &mut (dyn AsyncRead + Send + Unpin),
    ) -> anyhow::Result<()> {
        let mut data = Vec::new();
        source.read_to_end(&mut data).await?;
        let item = self
            .codec
            .decode(&data)
            .with_context(|| format!("item {index} is not a valid object payload"))?;
        self.items.push(item);
        Ok(())
    }

    async fn discard(&mut self) {
        self.items.clear();
    }
}

/// Copies every item into one file; a later item overwrites an earlier one.
#[derive(Debug)]
pub struct FileTarget {
    path: PathBuf,
    touched: bool,
}

impl FileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            touched: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PayloadConsumer for FileTarget {
    async fn read_from(
        &mut self,
        _index: usize,
        _mime: &MimeType,
        source: &mut (dyn AsyncRead + Send + Unpin),
    ) -> anyhow::Result<()> {
        self.touched = true;
        copy_into(source, &self.path).await
    }

    async fn discard(&mut self) {
        if self.touched {
            remove_quietly(&self.path).await;
            self.touched = false;
        }
    }
}

/// Copies each item into its own uniquely named file inside a directory.
#[derive(Debug)]
pub struct DirectoryTarget {
    dir: PathBuf,
    items: Vec<PathBuf>,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[PathBuf] {
        &self.items
    }

    pub fn into_items(self) -> Vec<PathBuf> {
        self.items
    }
}

#[async_trait]
impl PayloadConsumer for DirectoryTarget {
    async fn read_from(
        &mut self,
        _index: usize,
        _mime: &MimeType,
        source: &mut (dyn AsyncRead + Send + Unpin),
    ) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create target dir: {}", self.dir.display()))?;
        let path = self.dir.join(uuid::Uuid::new_v4().to_string());
        if let Err(err) = copy_into(source, &path).await {
            remove_quietly(&path).await;
            return Err(err);
        }
        self.items.push(path);
        Ok(())
    }

    async fn discard(&mut self) {
        for path in self.items.drain(..) {
            remove_quietly(&path).await;
        }
    }
}

async fn copy_into(source: &mut (dyn AsyncRead + Send + Unpin), path: &Path) -> anyhow::Result<()> {
    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create target file: {}", path.display()))?;
    tokio::io::copy(source, &mut file)
        .await
        .with_context(|| format!("Failed to write target file: {}", path.display()))?;
    file.flush().await?;
    Ok(())
}

async fn remove_quietly(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %err, "Failed to remove partial output");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn directory_target_discard_removes_written_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut target = DirectoryTarget::new(dir.path().join("out"));

        let mut source: &[u8] = b"abc";
        target
            .read_from(0, &MimeType::octet_stream(), &mut source)
            .await
            .unwrap();
        assert_eq!(target.items().len(), 1);
        let written = target.items()[0].clone();
        assert_eq!(std::fs::read(&written).unwrap(), b"abc");

        target.discard().await;
        assert!(target.items().is_empty());
        assert!(!written.exists());
    }

    #[tokio::test]
    async fn object_collector_reports_undecodable_item() {
        let mut collector = ObjectCollector::<Vec<u32>>::new(ObjectCodec::Json);
        let mut source: &[u8] = b"not json";
        let err = collector
            .read_from(3, &MimeType::octet_stream(), &mut source)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("item 3"));
    }
}
