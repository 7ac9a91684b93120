//! Themes and streamer mode

use aideck_storage::{DataDir, StorageError};

use crate::preferences::DEFAULT_THEME;

const THEME_EXTENSION: &str = "css";

/// Page regions hidden while streamer mode is on
pub const STREAMER_HIDE_SELECTORS: &[&str] = &[
    "body div#app",
    "body div.threads div.main-content",
    "body div.text-xs > div",
];

/// One `display: none` rule per hidden selector
pub fn streamer_rules() -> Vec<String> {
    STREAMER_HIDE_SELECTORS
        .iter()
        .map(|selector| format!("{selector} {{ display: none !important; }}"))
        .collect()
}

/// User stylesheets dropped into the data directory.
#[derive(Debug, Clone)]
pub struct Themes {
    data_dir: DataDir,
}

impl Themes {
    pub fn new(data_dir: DataDir) -> Self {
        Self { data_dir }
    }

    /// Stylesheet file names, sorted; `default.css` when there are none.
    pub fn available(&self) -> Vec<String> {
        let themes = match self.data_dir.list_with_extension(THEME_EXTENSION) {
            Ok(themes) => themes,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list themes");
                Vec::new()
            }
        };

        if themes.is_empty() {
            vec![DEFAULT_THEME.to_string()]
        } else {
            themes
        }
    }

    /// Contents of the named stylesheet, if it exists.
    pub fn stylesheet(&self, name: &str) -> Option<String> {
        match self.data_dir.read_text(name) {
            Ok(css) => css,
            Err(StorageError::InvalidPath(_)) => {
                tracing::warn!(theme = %name, "Rejected theme name");
                None
            }
            Err(e) => {
                tracing::warn!(theme = %name, error = %e, "Failed to read theme");
                None
            }
        }
    }
}
