pub mod fs;

pub use fs::FilesystemItemStore;
