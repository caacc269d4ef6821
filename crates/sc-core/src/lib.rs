//! # sc-core
//!
//! Core domain models and ports for the SuperClipboard item store.
//!
//! This crate contains pure domain logic without any infrastructure dependencies:
//! tokens, locators, clipboard sets, the error taxonomy and the port traits that
//! the infrastructure and platform layers implement.

// Public module exports
pub mod app_dirs;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod ids;
pub mod ports;
pub mod route;

// Re-export commonly used types at the crate root
pub use clipboard::{
    ClipDescription, ClipboardGeneration, ClipboardSet, GenerationEvent, GenerationState, Locator,
    MimeType,
};
pub use config::AppConfig;
pub use error::ClipError;
pub use ids::ItemToken;
