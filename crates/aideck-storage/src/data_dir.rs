//! Per-user data directory

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::document::JsonFile;
use crate::error::StorageError;
use crate::Result;

const CONFIG_FILE: &str = "config.json";
const SESSIONS_FILE: &str = "sessions.json";

/// Root of everything the shell persists.
///
/// Holds `config.json`, `sessions.json` and any user-provided theme
/// stylesheets.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| StorageError::io(&self.root, e))
    }

    pub fn config_file(&self) -> JsonFile {
        JsonFile::new(self.root.join(CONFIG_FILE))
    }

    pub fn sessions_file(&self) -> JsonFile {
        JsonFile::new(self.root.join(SESSIONS_FILE))
    }

    /// File names directly under the root with the given extension, sorted.
    ///
    /// A missing root yields an empty list.
    pub fn list_with_extension(&self, extension: &str) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(&self.root, e)),
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
            })
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();

        names.sort();
        Ok(names)
    }

    /// Read a plain file that lives directly under the root.
    ///
    /// Names that would escape the root are refused with `InvalidPath`.
    /// A missing file yields `Ok(None)`.
    pub fn read_text(&self, file_name: &str) -> Result<Option<String>> {
        let path = self.child(file_name)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(&path, e)),
        }
    }

    fn child(&self, file_name: &str) -> Result<PathBuf> {
        let relative = Path::new(file_name);
        let mut components = relative.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(relative)),
            _ => Err(StorageError::InvalidPath(relative.to_path_buf())),
        }
    }
}
