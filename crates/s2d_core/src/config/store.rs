//! Document store for loading and atomically saving the config file.
//!
//! Key features:
//! - Atomic writes (write to temp file, then rename)
//! - Saves follow symlinks and keep the file's permissions
//! - The file handle is only held inside a single load or save call
//! - No field semantics: the document is stored exactly as edited

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::document::ConfigDocument;

/// Errors that can occur while reading, writing or locating the config file.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Config file not found or unreadable: {}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config {}: {source}", .path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },

    #[error("Failed to write config {}: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No config file found (searched: {})", display_paths(.searched))]
    NotLocated { searched: Vec<PathBuf> },
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Loads and saves the config document at one location.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    /// Path to the config file.
    path: PathBuf,
}

impl DocumentStore {
    /// Create a store for the given config file path.
    ///
    /// Nothing is read until `load()` is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the config file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the document.
    pub fn load(&self) -> StoreResult<ConfigDocument> {
        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::NotFound {
            path: self.path.clone(),
            source,
        })?;

        let document = content
            .parse::<ConfigDocument>()
            .map_err(|source| StoreError::ParseError {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), bytes = content.len(), "Loaded config document");
        Ok(document)
    }

    /// Write the document atomically.
    ///
    /// On failure the previous file is left as it was.
    pub fn save(&self, document: &ConfigDocument) -> StoreResult<()> {
        self.atomic_write(&document.to_string())
            .map_err(|source| StoreError::WriteError {
                path: self.path.clone(),
                source,
            })?;

        info!(path = %self.path.display(), "Saved config document");
        Ok(())
    }

    /// The file a save replaces: the symlink target when the path is a
    /// link, otherwise the path itself.
    fn write_target(&self) -> io::Result<PathBuf> {
        match fs::canonicalize(&self.path) {
            Ok(target) => Ok(target),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(self.path.clone()),
            Err(e) => Err(e),
        }
    }

    /// Write content to the config file atomically.
    ///
    /// Writes to a temp file next to the target first, then renames. An
    /// existing file keeps its permissions; a read-only one is refused.
    fn atomic_write(&self, content: &str) -> io::Result<()> {
        let target = self.write_target()?;

        let permissions = match fs::metadata(&target) {
            Ok(meta) if meta.permissions().readonly() => {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "config file is read-only",
                ));
            }
            Ok(meta) => Some(meta.permissions()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };

        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = temp_path(&target);
        let result = write_synced(&temp_path, content, permissions)
            .and_then(|()| fs::rename(&temp_path, &target));

        if result.is_err() && temp_path.is_file() {
            if let Err(e) = fs::remove_file(&temp_path) {
                warn!(path = %temp_path.display(), error = %e, "Failed to remove staged config file");
            }
        }

        result
    }
}

/// Sibling path used for the staged write.
fn temp_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("config"));
    name.push(".tmp");
    target.with_file_name(name)
}

fn write_synced(path: &Path, content: &str, permissions: Option<fs::Permissions>) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    if let Some(permissions) = permissions {
        file.set_permissions(permissions)?;
    }
    file.sync_all()
}
