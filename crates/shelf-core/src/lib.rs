//! shelf-core - Core library for Shelf
//!
//! This crate contains the document models, the editor state machine, the
//! remote store client, and the sync flows shared by every Shelf interface.

pub mod config;
pub mod editor;
pub mod error;
pub mod models;
pub mod retry;
pub mod store;
pub mod sync;
pub mod util;

pub use config::ClientConfig;
pub use editor::EditorState;
pub use error::{Error, Result};
pub use models::{Document, DocumentId, User};
pub use retry::{RetryError, RetryPolicy};
pub use store::{DocumentStore, DocumentStoreClient, StoreError, StoreResult};
pub use sync::SyncController;
