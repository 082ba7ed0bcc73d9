//! Config document storage for the Sports2D settings tool.
//!
//! This module provides:
//! - A format-preserving TOML document (`toml_edit` underneath)
//! - Atomic file writes (write to temp, then rename)
//! - Locating the config file the way a Sports2D install lays it out
//!
//! Unknown sections and keys are never interpreted here; they are carried
//! through a load/save cycle untouched.
//!
//! # Example
//!
//! ```no_run
//! use s2d_core::config::{find_config_file, DocumentStore};
//!
//! let path = find_config_file(None, None).unwrap();
//! let store = DocumentStore::new(path);
//! let document = store.load().unwrap();
//! store.save(&document).unwrap();
//! ```

mod document;
mod locate;
mod store;

pub use document::{ConfigDocument, PathConflict};
pub use locate::{find_config_file, resolve_config_path, CONFIG_ENV_VAR, DEMO_CONFIG_RELATIVE};
pub use store::{DocumentStore, StoreError, StoreResult};
