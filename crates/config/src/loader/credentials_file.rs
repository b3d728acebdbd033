//! Credentials file loading.
//!
//! Responsibilities:
//! - Resolve the credentials file path (explicit override or platform default).
//! - Fill access id/key the loader does not already have.
//!
//! Does NOT handle:
//! - Writing the file (see `persistence::save_credentials`).
//!
//! Invariants:
//! - A missing file is not an error; the loader reports `MissingCredentials` later if needed.
//! - The file is not read at all when env or CLI already supplied both values.

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::persistence::{default_credentials_path, read_credentials};

pub fn apply_credentials_file(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if loader.has_credentials() {
        return Ok(());
    }

    let path = match loader.config_path() {
        Some(path) => path.clone(),
        None => default_credentials_path()
            .map_err(|e| ConfigError::ConfigDirUnavailable(e.to_string()))?,
    };

    if !path.exists() {
        tracing::debug!(path = %path.display(), "No credentials file found");
        return Ok(());
    }

    let credentials = read_credentials(&path)?;
    loader.fill_credentials(credentials);
    Ok(())
}
