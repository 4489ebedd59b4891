//! Persistence adapters for taskdeck tasks.

pub mod error;
pub mod file;
pub mod http;
pub mod memory;
mod table;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use http::HttpStore;
pub use memory::MemoryStore;
