use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Base type for application-defined payload shapes.
pub const CURSOR_ITEM_BASE_TYPE: &str = "vnd.superclip.cursor.item";

/// Label describing the shape of a payload. Never stored on disk; it travels in the locator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MimeType(pub String);

impl MimeType {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn text_plain() -> Self {
        Self("text/plain".into())
    }

    pub fn octet_stream() -> Self {
        Self("application/octet-stream".into())
    }

    /// `vnd.superclip.cursor.item/<subtype>`, e.g. `custom("vnd.clipboard.data")`.
    pub fn custom(subtype: &str) -> Self {
        Self(format!("{CURSOR_ITEM_BASE_TYPE}/{subtype}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MimeType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MimeType(s.to_string()))
    }
}

impl From<&str> for MimeType {
    fn from(s: &str) -> Self {
        MimeType(s.to_string())
    }
}
