use std::io;

use thiserror::Error;

use crate::config_profiles::ProfileStoreError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] shelf_core::Error),
    #[error(transparent)]
    Store(#[from] shelf_core::StoreError),
    #[error(transparent)]
    Profiles(#[from] ProfileStoreError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Document title cannot be empty")]
    EmptyTitle,
    #[error("Document ID cannot be empty")]
    EmptyDocumentId,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
}
