//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases and the infrastructure
//! implementations, so the reconciliation logic stays independent of the
//! filesystem and of the host clipboard service.

pub mod app_dirs;
mod clipboard_bus;
pub mod errors;
mod item_store;
mod payload;

pub use app_dirs::AppDirsPort;
pub use clipboard_bus::{BusContent, BusEvent, ClipboardBusPort};
pub use errors::AppDirsError;
pub use item_store::{ItemSink, ItemSource, ItemStorePort};
pub use payload::{PayloadConsumer, PayloadProducer};
