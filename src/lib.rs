//! # superclip
//!
//! Transient object store behind a shared clipboard: payloads are written to a
//! private directory and only short locators travel over the clipboard bus.
//! 跨进程剪切板的临时对象存储：负载写入私有目录，剪切板上只传递定位符。

pub mod bootstrap;

pub use sc_app::payload;
pub use sc_app::SuperClipboard;
pub use sc_core::{AppConfig, ClipError, ClipboardSet, Locator, MimeType};
pub use sc_platform::ClipboardProvider;
