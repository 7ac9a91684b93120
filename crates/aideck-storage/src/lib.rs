//! AIDeck Storage Layer
//!
//! JSON document persistence for all shell state.
//! Every write goes through a temp file and an atomic rename.

mod data_dir;
mod document;
mod error;

pub use data_dir::DataDir;
pub use document::JsonFile;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
