//! Host cookie jar seam

use async_trait::async_trait;
use thiserror::Error;

use crate::cookie::{Cookie, CookieInstall};

/// Failure reported by the host cookie jar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CookieJarError(pub String);

impl CookieJarError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The cookie storage of one browsing session in the host web engine.
#[async_trait]
pub trait CookieJar: Send + Sync {
    /// Every cookie currently held by the jar
    async fn get_all(&self) -> Result<Vec<Cookie>, CookieJarError>;

    /// Install one cookie at its install URL
    async fn set(&self, install: &CookieInstall) -> Result<(), CookieJarError>;

    /// Remove every cookie from the jar
    async fn clear_all(&self) -> Result<(), CookieJarError>;
}

/// A single cookie the jar refused during a restore.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to install cookie {cookie} for {url}: {reason}")]
pub struct CookieInstallError {
    pub cookie: String,
    pub url: String,
    pub reason: String,
}

/// Outcome of applying a session to a cookie jar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreReport {
    pub session: String,
    pub installed: usize,
    /// Stored cookies without a usable domain
    pub skipped: usize,
    pub failures: Vec<CookieInstallError>,
}

impl RestoreReport {
    pub fn is_complete(&self) -> bool {
        self.skipped == 0 && self.failures.is_empty()
    }
}
