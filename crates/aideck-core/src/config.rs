//! Shell configuration

use std::path::PathBuf;

use aideck_storage::DataDir;

const APP_DIR_NAME: &str = "AIDeck";
const DATA_DIR_ENV: &str = "AIDECK_DATA_DIR";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding config.json, sessions.json and theme stylesheets
    pub data_dir: PathBuf,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Per-user data directory, `AIDECK_DATA_DIR` first.
    pub fn data_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            return PathBuf::from(dir);
        }

        dirs::user_data_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(".aideck"))
    }

    pub fn storage(&self) -> DataDir {
        DataDir::new(self.data_dir.clone())
    }

    pub fn config_path(&self) -> PathBuf {
        self.storage().config_file().path().to_path_buf()
    }

    pub fn sessions_path(&self) -> PathBuf {
        self.storage().sessions_file().path().to_path_buf()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

// Per-platform application data roots
mod dirs {
    use std::path::PathBuf;

    pub fn user_data_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("APPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_CONFIG_HOME")
                .ok()
                .filter(|d| !d.is_empty())
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".config"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
