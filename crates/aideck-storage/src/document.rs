//! JSON document files

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::StorageError;
use crate::Result;

/// A single JSON document on disk.
///
/// Writes are serialized through a shared lock and land atomically: the
/// document is encoded in full, written to `.<name>.tmp` next to the target,
/// synced, then renamed over the target. A failed write never leaves a
/// partially written document behind.
pub struct JsonFile {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the document.
    ///
    /// Returns `Ok(None)` when the file is missing or blank.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StorageError::json(&self.path, e))
    }

    /// Encode and atomically replace the document.
    pub fn save<T: Serialize>(&self, value: &T) -> Result<()> {
        let bytes =
            serde_json::to_vec_pretty(value).map_err(|e| StorageError::json(&self.path, e))?;

        let _guard = self.write_lock.lock();

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
            }
        }

        let tmp_path = self.temp_path()?;
        let written = File::create(&tmp_path).and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()
        });

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(StorageError::io(&tmp_path, e));
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StorageError::io(&self.path, e));
        }

        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "Saved document");

        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StorageError::InvalidPath(self.path.clone()))?;

        Ok(self
            .path
            .with_file_name(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

impl Clone for JsonFile {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            write_lock: Arc::clone(&self.write_lock),
        }
    }
}
