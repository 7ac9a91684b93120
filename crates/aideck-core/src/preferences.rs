//! Preference Store
//!
//! One settings record per installation, kept in `config.json`.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use aideck_session::DEFAULT_SESSION;
use aideck_storage::JsonFile;

use crate::Result;

pub const DEFAULT_THEME: &str = "default.css";
pub const DEFAULT_ASSISTANT: &str = "ChatGPT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Theme stylesheet file name
    pub theme: String,
    /// Provider label
    pub assistant: String,
    pub streamer_mode: bool,
    pub active_session: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            assistant: DEFAULT_ASSISTANT.to_string(),
            streamer_mode: false,
            active_session: DEFAULT_SESSION.to_string(),
        }
    }
}

impl Settings {
    /// Copy every field present in `partial` over this record.
    pub fn merge(&mut self, partial: PartialSettings) {
        if let Some(theme) = partial.theme {
            self.theme = theme;
        }
        if let Some(assistant) = partial.assistant {
            self.assistant = assistant;
        }
        if let Some(streamer_mode) = partial.streamer_mode {
            self.streamer_mode = streamer_mode;
        }
        if let Some(active_session) = partial.active_session {
            self.active_session = active_session;
        }
    }
}

/// A settings change; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streamer_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_session: Option<String>,
}

impl PartialSettings {
    pub fn theme(theme: impl Into<String>) -> Self {
        Self {
            theme: Some(theme.into()),
            ..Self::default()
        }
    }

    pub fn assistant(assistant: impl Into<String>) -> Self {
        Self {
            assistant: Some(assistant.into()),
            ..Self::default()
        }
    }

    pub fn streamer_mode(enabled: bool) -> Self {
        Self {
            streamer_mode: Some(enabled),
            ..Self::default()
        }
    }

    pub fn active_session(name: impl Into<String>) -> Self {
        Self {
            active_session: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub struct PreferenceStore {
    /// Last loaded or written record
    settings: Arc<RwLock<Option<Settings>>>,
    file: JsonFile,
}

impl PreferenceStore {
    pub fn new(file: JsonFile) -> Self {
        Self {
            settings: Arc::new(RwLock::new(None)),
            file,
        }
    }

    /// Read the persisted record.
    ///
    /// First run writes and returns the defaults. Read or parse failures fall
    /// back to the defaults and leave the file alone.
    pub fn load(&self) -> Settings {
        let settings = match self.file.load::<Settings>() {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                let defaults = Settings::default();
                match self.file.save(&defaults) {
                    Ok(()) => tracing::info!(
                        path = %self.file.path().display(),
                        "Created default preferences"
                    ),
                    Err(e) => tracing::warn!(error = %e, "Failed to write default preferences"),
                }
                defaults
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable preferences, using defaults");
                Settings::default()
            }
        };

        *self.settings.write() = Some(settings.clone());
        settings
    }

    /// The cached record, loading it on first use.
    pub fn current(&self) -> Settings {
        if let Some(settings) = self.settings.read().clone() {
            return settings;
        }
        self.load()
    }

    /// Merge `partial` into the current record and persist the result.
    ///
    /// On a failed write both the file and the cached record are unchanged.
    pub fn update(&self, partial: PartialSettings) -> Result<Settings> {
        let mut next = self.current();
        next.merge(partial);

        if let Err(e) = self.file.save(&next) {
            tracing::error!(error = %e, "Failed to write preferences");
            return Err(e.into());
        }

        *self.settings.write() = Some(next.clone());

        tracing::info!(
            theme = %next.theme,
            assistant = %next.assistant,
            streamer_mode = next.streamer_mode,
            active_session = %next.active_session,
            "Updated preferences"
        );

        Ok(next)
    }
}

impl Clone for PreferenceStore {
    fn clone(&self) -> Self {
        Self {
            settings: Arc::clone(&self.settings),
            file: self.file.clone(),
        }
    }
}
