mod clipboard_set;
mod generation;
pub mod locator;
mod mime;

pub use clipboard_set::{ClipDescription, ClipboardSet, URI_LABEL};
pub use generation::{ClipboardGeneration, GenerationEvent, GenerationState, InvalidTransition};
pub use locator::Locator;
pub use mime::MimeType;
