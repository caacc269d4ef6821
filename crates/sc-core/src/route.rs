//! Fixed routing table for the provider surface.
//!
//! Four path shapes, matched segment by segment; `*` matches any single non-empty segment.

use crate::clipboard::locator::{ITEM_SEGMENT, SEPARATOR};

pub const CHECK_SEGMENT: &str = "check";
pub const CLEAR_SEGMENT: &str = "clear";
pub const DELETE_SEGMENT: &str = "delete";

const WILDCARD: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// `item/*/*`: an item's byte stream.
    Item,
    /// `check/*`: existence probe for one token.
    Check,
    /// `clear`: delete everything.
    Clear,
    /// `delete`: delete everything except the tokens passed as arguments.
    Delete,
}

pub struct RoutePattern {
    pub kind: RouteKind,
    pub segments: &'static [&'static str],
}

pub const ROUTES: [RoutePattern; 4] = [
    RoutePattern {
        kind: RouteKind::Item,
        segments: &[ITEM_SEGMENT, WILDCARD, WILDCARD],
    },
    RoutePattern {
        kind: RouteKind::Check,
        segments: &[CHECK_SEGMENT, WILDCARD],
    },
    RoutePattern {
        kind: RouteKind::Clear,
        segments: &[CLEAR_SEGMENT],
    },
    RoutePattern {
        kind: RouteKind::Delete,
        segments: &[DELETE_SEGMENT],
    },
];

/// A matched path: the route kind and the raw segments of the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute<'a> {
    pub kind: RouteKind,
    pub segments: Vec<&'a str>,
}

impl RoutePattern {
    fn matches(&self, segments: &[&str]) -> bool {
        self.segments.len() == segments.len()
            && self
                .segments
                .iter()
                .zip(segments)
                .all(|(pattern, segment)| {
                    if *pattern == WILDCARD {
                        !segment.is_empty()
                    } else {
                        pattern == segment
                    }
                })
    }
}

pub fn match_path(path: &str) -> Option<MatchedRoute<'_>> {
    let segments: Vec<&str> = path.split(SEPARATOR).collect();
    ROUTES
        .iter()
        .find(|route| route.matches(&segments))
        .map(|route| MatchedRoute {
            kind: route.kind,
            segments,
        })
}

pub fn check_path(token: &str) -> String {
    format!("{CHECK_SEGMENT}{SEPARATOR}{token}")
}
