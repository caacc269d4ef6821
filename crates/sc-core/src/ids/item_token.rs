use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;
use crate::error::ClipError;

/// Opaque, unguessable name of a stored item.
///
/// The token doubles as the item's file name inside the store directory, so a
/// token accepted from the outside must never address anything but a direct
/// child of that directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemToken(String);

impl_id!(ItemToken);

impl ItemToken {
    /// Validate a token received from a locator, a provider path or a directory scan.
    pub fn parse(value: &str) -> Result<Self, ClipError> {
        if Self::is_valid(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(ClipError::malformed(format!("invalid item token: {value:?}")))
        }
    }

    pub fn is_valid(value: &str) -> bool {
        !value.is_empty()
            && value != "."
            && value != ".."
            && !value.contains(['/', '\\', '\0'])
    }
}
