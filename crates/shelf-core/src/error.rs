//! Error types for shelf-core

use thiserror::Error;

use crate::retry::RetryError;
use crate::store::StoreError;

/// Result type alias using shelf-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in shelf-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Remote store request failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Every retry attempt against the store failed
    #[error(transparent)]
    Retry(#[from] RetryError<StoreError>),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
