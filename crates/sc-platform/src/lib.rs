//! # sc-platform
//!
//! Host-facing implementations for SuperClipboard.
//!
//! This crate contains the adapters that sit between the item store and the
//! outside world: the clipboard bus, the provider surface other processes talk
//! to, and the resolution of per-user data directories.

pub mod app_dirs;
pub mod bus;
pub mod provider;

pub use app_dirs::DirsAppDirsAdapter;
pub use bus::InMemoryClipboardBus;
pub use provider::{ClipboardProvider, CursorError, ExistenceCursor, ItemStream, OpenMode};
