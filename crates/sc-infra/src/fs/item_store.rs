//! Filesystem-based item storage
//! 基于文件系统的剪切板条目存储

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sc_core::ports::{ItemSink, ItemSource, ItemStorePort};
use sc_core::{ClipError, ItemToken};
use tokio::fs;
use tracing::{debug, warn};

/// Filesystem-based item storage: one file per token, all in one flat directory.
/// 基于文件系统的条目存储：每个 token 一个文件，全部位于同一目录。
///
/// Several processes may share the directory. Nothing here takes a lock; safety comes
/// from unique tokens and from every delete path tolerating files that are already gone.
#[derive(Debug, Clone)]
pub struct FilesystemItemStore {
    base_dir: PathBuf,
}

impl FilesystemItemStore {
    /// Create a new item store with the given base directory. The directory is created lazily.
    /// 使用给定基础目录创建条目存储，目录在首次使用时创建。
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Ensure the item directory exists
    /// 确保条目目录存在
    async fn ensure_dir(&self) -> Result<(), ClipError> {
        fs::create_dir_all(&self.base_dir).await.map_err(|err| {
            ClipError::StoreUnavailable(format!(
                "failed to create item directory {}: {err}",
                self.base_dir.display()
            ))
        })
    }

    /// Get the full path for a token
    /// 获取 token 对应的完整路径
    fn item_path(&self, token: &ItemToken) -> Result<PathBuf, ClipError> {
        if !ItemToken::is_valid(token.as_str()) {
            return Err(ClipError::malformed(format!("invalid item token: {token:?}")));
        }
        Ok(self.base_dir.join(token.as_str()))
    }

    /// Create the file for `token`; an existing file is never reopened.
    async fn create_item(&self, token: &ItemToken) -> Result<ItemSink, ClipError> {
        self.ensure_dir().await?;
        let path = self.item_path(token)?;
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|err| match err.kind() {
                io::ErrorKind::AlreadyExists => {
                    ClipError::malformed(format!("item {token} is already written"))
                }
                _ => ClipError::StoreUnavailable(format!(
                    "failed to create item {}: {err}",
                    path.display()
                )),
            })?;
        Ok(Box::new(file))
    }

    /// Snapshot of the directory entries. A missing directory is empty.
    async fn scan(&self) -> Result<Vec<fs::DirEntry>, ClipError> {
        let scan_failed = |err: io::Error| {
            ClipError::StoreUnavailable(format!(
                "failed to scan item directory {}: {err}",
                self.base_dir.display()
            ))
        };

        let mut dir = match fs::read_dir(&self.base_dir).await {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(scan_failed(err)),
        };
        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(scan_failed)? {
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Delete every direct child whose name is not in `keep`.
    /// 删除目录中名称不在 `keep` 内的所有条目。
    async fn sweep(&self, keep: &HashSet<&str>) -> Result<usize, ClipError> {
        let mut removed = 0usize;
        for entry in self.scan().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                warn!("Skipping item entry with non-utf8 filename");
                continue;
            };
            if keep.contains(name) {
                continue;
            }

            let path = entry.path();
            let is_dir = match entry.file_type().await {
                Ok(file_type) => file_type.is_dir(),
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => {
                    warn!(item = name, error = %err, "Failed to stat item");
                    continue;
                }
            };
            let result = if is_dir {
                fs::remove_dir_all(&path).await
            } else {
                fs::remove_file(&path).await
            };
            match result {
                Ok(()) => {
                    debug!(item = name, "Removed item");
                    removed += 1;
                }
                // Another process got there first.
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => warn!(item = name, error = %err, "Failed to remove item"),
            }
        }
        Ok(removed)
    }
}

#[async_trait]
impl ItemStorePort for FilesystemItemStore {
    async fn open_write(&self, token: &ItemToken) -> Result<ItemSink, ClipError> {
        self.create_item(token).await
    }

    async fn begin_write(&self) -> Result<(ItemToken, ItemSink), ClipError> {
        let token = ItemToken::new();
        let sink = self.create_item(&token).await?;
        debug!(token = %token, "Allocated item");
        Ok((token, sink))
    }

    async fn open_read(&self, token: &ItemToken) -> Result<ItemSource, ClipError> {
        let path = self.item_path(token)?;
        match fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(file)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(ClipError::NotFound(token.clone()))
            }
            Err(err) => Err(ClipError::StoreUnavailable(format!(
                "failed to open item {}: {err}",
                path.display()
            ))),
        }
    }

    async fn exists(&self, token: &ItemToken) -> Result<bool, ClipError> {
        let path = self.item_path(token)?;
        fs::try_exists(&path)
            .await
            .map_err(ClipError::store_unavailable)
    }

    async fn delete(&self, token: &ItemToken) -> Result<bool, ClipError> {
        let path = self.item_path(token)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(ClipError::StoreUnavailable(format!(
                "failed to delete item {}: {err}",
                path.display()
            ))),
        }
    }

    async fn delete_all_except(&self, keep: &HashSet<ItemToken>) -> Result<usize, ClipError> {
        let keep: HashSet<&str> = keep.iter().map(ItemToken::as_str).collect();
        self.sweep(&keep).await
    }

    async fn clear(&self) -> Result<usize, ClipError> {
        self.sweep(&HashSet::new()).await
    }
}
