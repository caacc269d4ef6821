use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::clipboard::{Locator, MimeType};
use crate::error::ClipError;
use crate::ids::ItemToken;

/// Label advertised with every clipboard set.
pub const URI_LABEL: &str = "URI";

/// Human-readable label plus the distinct mime labels of a clipboard set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipDescription {
    pub label: String,
    pub mime_types: Vec<MimeType>,
}

impl ClipDescription {
    pub fn has_mime_type(&self, mime: &MimeType) -> bool {
        self.mime_types.iter().any(|m| m == mime)
    }
}

/// The ordered locators currently advertised on the bus.
///
/// Every locator of a live set must resolve to an existing item. The reconciler keeps
/// that eventually true from the other side by removing items the set does not name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardSet {
    description: ClipDescription,
    locators: Vec<Locator>,
}

impl ClipboardSet {
    /// Build a set; mime labels are collected in first-seen order without duplicates.
    pub fn new(label: impl Into<String>, locators: Vec<Locator>) -> Self {
        let mut mime_types: Vec<MimeType> = Vec::new();
        for locator in &locators {
            if !mime_types.contains(locator.mime()) {
                mime_types.push(locator.mime().clone());
            }
        }
        Self {
            description: ClipDescription {
                label: label.into(),
                mime_types,
            },
            locators,
        }
    }

    pub fn from_locators(locators: Vec<Locator>) -> Self {
        Self::new(URI_LABEL, locators)
    }

    /// Rebuild a set from what the bus reports. Fails on the first malformed locator.
    pub fn from_wire(description: ClipDescription, locators: &[String]) -> Result<Self, ClipError> {
        let locators = locators
            .iter()
            .map(|raw| Locator::decode(raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            description,
            locators,
        })
    }

    pub fn description(&self) -> &ClipDescription {
        &self.description
    }

    pub fn locators(&self) -> &[Locator] {
        &self.locators
    }

    pub fn len(&self) -> usize {
        self.locators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }

    pub fn tokens(&self) -> HashSet<ItemToken> {
        self.locators.iter().map(|l| l.token().clone()).collect()
    }

    pub fn encoded_locators(&self) -> Vec<String> {
        self.locators.iter().map(Locator::encode).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator(mime: &str, token: &str) -> Locator {
        Locator::new(MimeType::from(mime), ItemToken::from(token))
    }

    #[test]
    fn collects_distinct_mimes_in_order() {
        let set = ClipboardSet::from_locators(vec![
            locator("b/b", "1"),
            locator("a/a", "2"),
            locator("b/b", "3"),
        ]);
        assert_eq!(set.description().label, URI_LABEL);
        assert_eq!(
            set.description().mime_types,
            vec![MimeType::from("b/b"), MimeType::from("a/a")]
        );
        assert_eq!(set.tokens().len(), 3);
    }

    #[test]
    fn from_wire_rejects_malformed_locator() {
        let description = ClipDescription {
            label: URI_LABEL.into(),
            mime_types: vec![],
        };
        let wire = vec!["item/a%2Fa/1".to_string(), "garbage".to_string()];
        assert!(matches!(
            ClipboardSet::from_wire(description, &wire),
            Err(ClipError::Malformed(_))
        ));
    }
}
