pub mod read_clipboard_set;
pub mod reconcile;
pub mod start_clipboard_watcher;
pub mod write_clipboard_set;

pub use read_clipboard_set::ReadClipboardSet;
pub use reconcile::{LiveCheck, Reconciler};
pub use start_clipboard_watcher::{StartClipboardWatcher, WatcherHandle};
pub use write_clipboard_set::WriteClipboardSet;
