//! Provider surface over the item store
//! 条目存储的 provider 访问面
//!
//! Other processes never touch the store directory directly. They address it through
//! four path shapes (see [`sc_core::route`]): `item/*/*` for byte streams, `check/*`
//! for existence, `clear` and `delete` for garbage collection.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use sc_core::clipboard::locator;
use sc_core::ports::{ItemSink, ItemSource, ItemStorePort};
use sc_core::route::{self, RouteKind};
use sc_core::{ClipError, ItemToken, Locator, MimeType};
use tracing::{debug, warn};

const COLUMN_DATA: &str = "data";

/// Access mode for [`ClipboardProvider::open_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
}

impl FromStr for OpenMode {
    type Err = ClipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" => Ok(OpenMode::Read),
            "w" => Ok(OpenMode::Write),
            other => Err(ClipError::malformed(format!("unsupported open mode: {other}"))),
        }
    }
}

pub enum ItemStream {
    Read(ItemSource),
    Write(ItemSink),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CursorError {
    #[error("{0} is not supported")]
    UnsupportedType(&'static str),

    #[error("column {0} out of range")]
    ColumnOutOfRange(usize),
}

/// Result of a `check/<token>` query: one row, one blob column named `data`.
///
/// The blob is `[1]` when the item exists and `[0]` otherwise. No other
/// representation of the cell is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistenceCursor {
    blob: [u8; 1],
}

impl ExistenceCursor {
    pub fn new(exists: bool) -> Self {
        Self {
            blob: [u8::from(exists)],
        }
    }

    pub fn count(&self) -> usize {
        1
    }

    pub fn column_names(&self) -> &'static [&'static str] {
        &[COLUMN_DATA]
    }

    pub fn blob(&self, column: usize) -> Result<&[u8], CursorError> {
        if column == 0 {
            Ok(&self.blob)
        } else {
            Err(CursorError::ColumnOutOfRange(column))
        }
    }

    pub fn is_null(&self, column: usize) -> bool {
        column != 0
    }

    pub fn string(&self, _column: usize) -> Result<String, CursorError> {
        Err(CursorError::UnsupportedType("string"))
    }

    pub fn int(&self, _column: usize) -> Result<i32, CursorError> {
        Err(CursorError::UnsupportedType("int"))
    }

    pub fn long(&self, _column: usize) -> Result<i64, CursorError> {
        Err(CursorError::UnsupportedType("long"))
    }

    pub fn double(&self, _column: usize) -> Result<f64, CursorError> {
        Err(CursorError::UnsupportedType("double"))
    }

    /// Reads the cell the way a remote client would.
    pub fn exists(&self) -> bool {
        matches!(self.blob(0), Ok([b]) if *b != 0)
    }
}

/// Routes provider paths onto an [`ItemStorePort`].
/// 将 provider 路径路由到条目存储。
#[derive(Clone)]
pub struct ClipboardProvider {
    store: Arc<dyn ItemStorePort>,
}

impl ClipboardProvider {
    pub fn new(store: Arc<dyn ItemStorePort>) -> Self {
        Self { store }
    }

    /// `check/<token>` only; every other path is `Malformed`.
    pub async fn query(&self, path: &str) -> Result<ExistenceCursor, ClipError> {
        let matched = route::match_path(path)
            .filter(|m| m.kind == RouteKind::Check)
            .ok_or_else(|| ClipError::malformed(path))?;
        let token = ItemToken::parse(matched.segments[1])?;
        let exists = self.store.exists(&token).await?;
        debug!(token = %token, exists, "Existence probe");
        Ok(ExistenceCursor::new(exists))
    }

    /// `clear` wipes the store; `delete` keeps only the tokens in `args`. Other paths delete nothing.
    pub async fn delete(&self, path: &str, args: &[String]) -> Result<usize, ClipError> {
        match route::match_path(path).map(|m| m.kind) {
            Some(RouteKind::Clear) => self.store.clear().await,
            Some(RouteKind::Delete) => {
                let keep: HashSet<ItemToken> = args
                    .iter()
                    .filter(|arg| ItemToken::is_valid(arg))
                    .map(|arg| ItemToken::from(arg.as_str()))
                    .collect();
                self.store.delete_all_except(&keep).await
            }
            _ => Ok(0),
        }
    }

    /// Open the item addressed by an `item/<mime>/<token>` path.
    pub async fn open_item(&self, path: &str, mode: OpenMode) -> Result<ItemStream, ClipError> {
        route::match_path(path)
            .filter(|m| m.kind == RouteKind::Item)
            .ok_or_else(|| ClipError::malformed(path))?;
        let locator = Locator::decode(path)?;
        match mode {
            OpenMode::Write => Ok(ItemStream::Write(
                self.store.open_write(locator.token()).await?,
            )),
            OpenMode::Read => Ok(ItemStream::Read(
                self.store.open_read(locator.token()).await?,
            )),
        }
    }

    /// Decoded mime of an item path; `None` for anything else.
    pub fn get_type(&self, path: &str) -> Option<MimeType> {
        Locator::decode(path).ok().map(|l| l.mime().clone())
    }

    pub async fn clear(&self) -> Result<usize, ClipError> {
        self.delete(route::CLEAR_SEGMENT, &[]).await
    }

    /// Delete every item not referenced by `locators`. Malformed locators reference nothing.
    pub async fn delete_except(&self, locators: &[String]) -> Result<usize, ClipError> {
        let names: Vec<String> = locators
            .iter()
            .filter_map(|raw| Locator::decode(raw).ok())
            .map(|l| l.token().to_string())
            .collect();
        self.delete(route::DELETE_SEGMENT, &names).await
    }

    /// Whether `raw_locator` names an item that exists, optionally requiring a mime match.
    pub async fn check_available(&self, mime_filter: Option<&MimeType>, raw_locator: &str) -> bool {
        let Ok(locator) = Locator::decode(raw_locator) else {
            return false;
        };
        if let Some(mime) = mime_filter {
            if mime != locator.mime() {
                return false;
            }
        }
        match self.query(&route::check_path(locator.token().as_str())).await {
            Ok(cursor) => cursor.exists(),
            Err(err) => {
                warn!(locator = raw_locator, error = %err, "Existence probe failed");
                false
            }
        }
    }

    /// Item path for a fresh write through the provider.
    pub fn item_path(mime: &MimeType, token: &ItemToken) -> String {
        locator::encode(mime, token)
    }
}
