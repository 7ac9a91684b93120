//! Session Store
//!
//! Owns the session map and its `sessions.json` document.
//! Every mutation builds the next map in memory, writes it, and only then
//! replaces the cached map.

use parking_lot::RwLock;
use std::sync::Arc;

use aideck_storage::JsonFile;

use crate::cookie::{Cookie, CookieInstall};
use crate::error::SessionError;
use crate::jar::{CookieInstallError, CookieJar, RestoreReport};
use crate::session::{Session, SessionMap};
use crate::Result;

/// Name of the session captured from the host on first launch
pub const DEFAULT_SESSION: &str = "default";

pub struct SessionStore {
    /// In-memory session cache
    sessions: Arc<RwLock<SessionMap>>,
    /// Backing document
    file: JsonFile,
}

impl SessionStore {
    /// Open the store, reading any persisted sessions.
    ///
    /// A missing document starts an empty map.
    pub fn open(file: JsonFile) -> Result<Self> {
        let sessions = file.load::<SessionMap>()?.unwrap_or_default();

        tracing::info!(
            path = %file.path().display(),
            session_count = sessions.len(),
            "Loaded sessions"
        );

        Ok(Self {
            sessions: Arc::new(RwLock::new(sessions)),
            file,
        })
    }

    pub fn list_names(&self) -> Vec<String> {
        self.sessions.read().names()
    }

    pub fn contains(&self, name: &str) -> bool {
        session_key(name).is_some_and(|key| self.sessions.read().contains(key))
    }

    pub fn get(&self, name: &str) -> Option<Session> {
        let key = session_key(name)?;
        self.sessions.read().get(key).cloned()
    }

    /// Store `cookies` under `name`.
    ///
    /// Returns `false` without touching anything when `cookies` is empty.
    pub fn save(&self, name: &str, cookies: Vec<Cookie>) -> Result<bool> {
        let name = session_key(name).ok_or(SessionError::EmptyName)?;

        if cookies.is_empty() {
            tracing::warn!(session = %name, "Refusing to save a session without cookies");
            return Ok(false);
        }

        let cookie_count = cookies.len();
        let mut next = self.sessions.read().clone();
        let replaced = next
            .insert(name.to_string(), Session::new(cookies))
            .is_some();
        self.commit(next)?;

        tracing::info!(
            session = %name,
            cookie_count,
            replaced,
            "Saved session"
        );

        Ok(true)
    }

    /// Cookies to install for `name`, normalised, with their install URLs.
    ///
    /// Unknown names yield nothing. Cookies without a usable domain are
    /// skipped.
    pub fn restore(&self, name: &str) -> Vec<CookieInstall> {
        let sessions = self.sessions.read();
        let Some(session) = session_key(name).and_then(|key| sessions.get(key)) else {
            tracing::debug!(session = %name, "No stored session to restore");
            return Vec::new();
        };

        session
            .cookies
            .iter()
            .filter_map(|cookie| {
                let install = CookieInstall::prepare(cookie);
                if install.is_none() {
                    tracing::warn!(
                        session = %name,
                        cookie = %cookie.name,
                        domain = ?cookie.domain,
                        "Skipping cookie without a usable domain"
                    );
                }
                install
            })
            .collect()
    }

    /// Remove `name`; `false` when it was not stored.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let Some(name) = session_key(name) else {
            return Ok(false);
        };

        let mut next = self.sessions.read().clone();
        if next.remove(name).is_none() {
            return Ok(false);
        }

        self.commit(next)?;
        tracing::info!(session = %name, "Deleted session");

        Ok(true)
    }

    /// Seed `default` from `current_cookies` if it does not exist yet, then
    /// return the `default` installs.
    pub fn ensure_default(&self, current_cookies: Vec<Cookie>) -> Result<Vec<CookieInstall>> {
        if !self.contains(DEFAULT_SESSION) {
            self.save(DEFAULT_SESSION, current_cookies)?;
        }
        Ok(self.restore(DEFAULT_SESSION))
    }

    /// Save everything currently in `jar` under `name`.
    pub async fn capture(&self, name: &str, jar: &dyn CookieJar) -> Result<bool> {
        let cookies = jar.get_all().await?;
        self.save(name, cookies)
    }

    /// Replace the contents of `jar` with the session stored under `name`.
    pub async fn apply(&self, name: &str, jar: &dyn CookieJar) -> Result<RestoreReport> {
        let installs = self.restore(name);
        self.install(name, installs, jar).await
    }

    /// Seed `default` from the jar on first launch, then apply it.
    pub async fn ensure_default_from_jar(&self, jar: &dyn CookieJar) -> Result<RestoreReport> {
        let current = jar.get_all().await?;
        let installs = self.ensure_default(current)?;
        self.install(DEFAULT_SESSION, installs, jar).await
    }

    async fn install(
        &self,
        name: &str,
        installs: Vec<CookieInstall>,
        jar: &dyn CookieJar,
    ) -> Result<RestoreReport> {
        let stored = self.get(name).map(|s| s.cookie_count()).unwrap_or(0);

        jar.clear_all().await?;

        let mut report = RestoreReport {
            session: session_key(name).unwrap_or(name).to_string(),
            skipped: stored.saturating_sub(installs.len()),
            ..RestoreReport::default()
        };

        for install in &installs {
            match jar.set(install).await {
                Ok(()) => report.installed += 1,
                Err(e) => {
                    tracing::warn!(
                        session = %name,
                        cookie = %install.cookie.name,
                        url = %install.url,
                        error = %e,
                        "Cookie jar rejected cookie"
                    );
                    report.failures.push(CookieInstallError {
                        cookie: install.cookie.name.clone(),
                        url: install.url.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            session = %name,
            installed = report.installed,
            skipped = report.skipped,
            failed = report.failures.len(),
            "Restored session"
        );

        Ok(report)
    }

    fn commit(&self, next: SessionMap) -> Result<()> {
        if let Err(e) = self.file.save(&next) {
            tracing::error!(path = %self.file.path().display(), error = %e, "Failed to write sessions");
            return Err(e.into());
        }
        *self.sessions.write() = next;
        Ok(())
    }
}

/// Names are stored trimmed; blank names never match.
fn session_key(name: &str) -> Option<&str> {
    let key = name.trim();
    (!key.is_empty()).then_some(key)
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            file: self.file.clone(),
        }
    }
}
