//! Application layer: write/read transactions, reconciliation and the
//! `SuperClipboard` facade.
//! 应用层：读写事务、一致性维护与超级剪贴板门面。

pub mod payload;
pub mod super_clipboard;
pub mod usecases;

pub use super_clipboard::SuperClipboard;
