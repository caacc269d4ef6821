//! Error taxonomy shared by every layer.

use thiserror::Error;

use crate::ids::ItemToken;

/// Closed set of failures surfaced by the item store, the transactions and the bus.
#[derive(Debug, Error)]
pub enum ClipError {
    /// Nothing to write.
    #[error("nothing to write")]
    EmptyInput,

    /// A payload producer failed or reported an empty mime. Partial writes were rolled back.
    #[error("write failed at item {index}: {reason}")]
    WriteFailed { index: usize, reason: String },

    /// Token absent at read time.
    #[error("item not found: {0}")]
    NotFound(ItemToken),

    /// Locator or path failed structural decode.
    #[error("malformed locator: {0}")]
    Malformed(String),

    /// An item in a read batch could not be delivered; the whole batch is aborted.
    #[error("read failed at item {index}: {reason}")]
    ReadFailed { index: usize, reason: String },

    /// Backing directory inaccessible.
    #[error("item store unavailable: {0}")]
    StoreUnavailable(String),

    /// External clipboard service absent or rejecting requests.
    #[error("clipboard bus unavailable: {0}")]
    BusUnavailable(String),
}

impl ClipError {
    pub fn malformed(value: impl Into<String>) -> Self {
        ClipError::Malformed(value.into())
    }

    pub fn store_unavailable(err: impl std::fmt::Display) -> Self {
        ClipError::StoreUnavailable(err.to_string())
    }

    pub fn bus_unavailable(err: impl std::fmt::Display) -> Self {
        ClipError::BusUnavailable(err.to_string())
    }
}
