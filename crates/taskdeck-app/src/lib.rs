//! Application layer for taskdeck.
//!
//! This crate owns the task collection state machine, the undo window, edit
//! sessions, and configuration shared by the command-line front end.

pub mod async_store;
pub mod collection;
pub mod config;
pub mod edit_session;
pub mod error;
pub mod undo;

// Re-exports for convenience
pub use async_store::AsyncTaskStore;
pub use collection::{CollectionOptions, TaskCollection};
pub use config::{AppConfig, Backend, StoreConfig, UndoConfig, ViewConfig};
pub use edit_session::EditSession;
pub use error::CollectionError;
pub use undo::{DEFAULT_UNDO_WINDOW, PendingDeletion, UndoSlot};
