//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session name cannot be empty")]
    EmptyName,

    #[error("Storage error: {0}")]
    Storage(#[from] aideck_storage::StorageError),

    #[error("Cookie jar error: {0}")]
    Jar(#[from] crate::jar::CookieJarError),
}
