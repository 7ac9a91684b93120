//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] aideck_storage::StorageError),

    #[error("Session error: {0}")]
    Session(#[from] aideck_session::SessionError),

    #[error("Cookie jar error: {0}")]
    Jar(#[from] aideck_session::CookieJarError),

    #[error("Unknown assistant: {0}")]
    UnknownAssistant(String),
}
