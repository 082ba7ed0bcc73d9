//! Finding the Sports2D config file on disk.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::store::{StoreError, StoreResult};

/// Environment variable that may point at the config file.
pub const CONFIG_ENV_VAR: &str = "SPORTS2D_CONFIG";

/// Location of the demo config inside an installed Sports2D package.
pub const DEMO_CONFIG_RELATIVE: &str = "Demo/Config_demo.toml";

/// Resolve the config file using the process environment.
///
/// Order: explicit path, `SPORTS2D_CONFIG`, then the demo config inside
/// `package_dir`.
pub fn find_config_file(
    explicit: Option<&Path>,
    package_dir: Option<&Path>,
) -> StoreResult<PathBuf> {
    resolve_config_path(explicit, std::env::var_os(CONFIG_ENV_VAR), package_dir)
}

/// Resolve the config file from already-gathered inputs.
///
/// An explicit path must exist; the other candidates are skipped when they
/// do not.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env_value: Option<OsString>,
    package_dir: Option<&Path>,
) -> StoreResult<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(StoreError::NotFound {
            path: path.to_path_buf(),
            source: io::Error::from(io::ErrorKind::NotFound),
        });
    }

    let candidates = env_value
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .into_iter()
        .chain(package_dir.map(|dir| dir.join(DEMO_CONFIG_RELATIVE)));

    let mut searched = Vec::new();
    for candidate in candidates {
        if candidate.is_file() {
            debug!(path = %candidate.display(), "Located config file");
            return Ok(candidate);
        }
        searched.push(candidate);
    }

    Err(StoreError::NotLocated { searched })
}
