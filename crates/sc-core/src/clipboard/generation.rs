//! Lifecycle of one clipboard generation.
//!
//! ```text
//! Empty -> Writing -> Published -> Stale | Cleared
//!            |
//!            +-> Empty (write aborted)
//! ```
//!
//! `Writing` is never visible outside the writing process; `Published` is the only
//! live state on the bus.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationState {
    Empty,
    Writing,
    Published,
    Stale,
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationEvent {
    BeginWrite,
    WriteAborted,
    Published,
    Superseded,
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid generation transition: {from:?} on {event:?}")]
pub struct InvalidTransition {
    pub from: GenerationState,
    pub event: GenerationEvent,
}

impl GenerationState {
    pub fn apply(self, event: GenerationEvent) -> Result<Self, InvalidTransition> {
        use GenerationEvent as E;
        use GenerationState as S;

        match (self, event) {
            (S::Empty, E::BeginWrite) => Ok(S::Writing),
            (S::Writing, E::WriteAborted) => Ok(S::Empty),
            (S::Writing, E::Published) => Ok(S::Published),
            (S::Published, E::Superseded) => Ok(S::Stale),
            (S::Published | S::Stale, E::Cleared) => Ok(S::Cleared),
            (from, event) => Err(InvalidTransition { from, event }),
        }
    }

    pub fn is_live(self) -> bool {
        self == GenerationState::Published
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, GenerationState::Stale | GenerationState::Cleared)
    }
}

/// A numbered generation as tracked by the writing process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardGeneration {
    pub number: u64,
    pub state: GenerationState,
}

impl ClipboardGeneration {
    pub fn new(number: u64) -> Self {
        Self {
            number,
            state: GenerationState::Empty,
        }
    }

    pub fn apply(&mut self, event: GenerationEvent) -> Result<GenerationState, InvalidTransition> {
        self.state = self.state.apply(event)?;
        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_reaches_published_then_stale() {
        let mut generation = ClipboardGeneration::new(1);
        generation.apply(GenerationEvent::BeginWrite).unwrap();
        generation.apply(GenerationEvent::Published).unwrap();
        assert!(generation.state.is_live());
        assert_eq!(
            generation.apply(GenerationEvent::Superseded).unwrap(),
            GenerationState::Stale
        );
        assert!(generation.state.is_terminal());
    }

    #[test]
    fn aborted_write_returns_to_empty() {
        let state = GenerationState::Empty
            .apply(GenerationEvent::BeginWrite)
            .and_then(|s| s.apply(GenerationEvent::WriteAborted))
            .unwrap();
        assert_eq!(state, GenerationState::Empty);
    }

    #[test]
    fn cleared_is_terminal() {
        let err = GenerationState::Cleared
            .apply(GenerationEvent::BeginWrite)
            .unwrap_err();
        assert_eq!(err.from, GenerationState::Cleared);
        assert!(GenerationState::Empty.apply(GenerationEvent::Published).is_err());
    }
}
