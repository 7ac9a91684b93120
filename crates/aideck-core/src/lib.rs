//! AIDeck Core
//!
//! Coordination layer for the AIDeck desktop shell.
//! Rust owns preferences and cookie sessions; the host window only renders.

mod appearance;
mod config;
mod error;
mod host;
mod menu;
mod preferences;
mod shell;

pub mod providers;

pub use appearance::{streamer_rules, Themes, STREAMER_HIDE_SELECTORS};
pub use config::Config;
pub use error::CoreError;
pub use host::{MenuHost, Prompt, View};
pub use menu::{MenuAction, MenuItem, MenuModel};
pub use preferences::{
    PartialSettings, PreferenceStore, Settings, DEFAULT_ASSISTANT, DEFAULT_THEME,
};
pub use providers::Provider;
pub use shell::{Host, Shell};

// Re-export session and storage components
pub use aideck_session::{
    Cookie, CookieInstall, CookieInstallError, CookieJar, CookieJarError, RestoreReport,
    SameSite, Session, SessionError, SessionStore, DEFAULT_SESSION,
};
pub use aideck_storage::{DataDir, JsonFile, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
