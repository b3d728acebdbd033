//! Setup command: store access credentials in the credentials file.
//!
//! Responsibilities:
//! - Prompt for whichever of access id/key was not given on the command line.
//! - Write the credentials file via `sumo_config::save_credentials`.
//!
//! Does NOT handle:
//! - Validating the credentials against the API.

use std::path::PathBuf;

use anyhow::{Context, Result};
use sumo_config::{Credentials, default_credentials_path, save_credentials};

pub(crate) fn run(
    access_id: Option<String>,
    access_key: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let path = match config_path {
        Some(path) => path,
        None => default_credentials_path()?,
    };

    let access_id = match non_blank(access_id) {
        Some(id) => id,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Access ID")
            .interact_text()
            .context("Failed to read access id")?,
    };
    let access_key = match non_blank(access_key) {
        Some(key) => key,
        None => dialoguer::Password::new()
            .with_prompt("Access key")
            .allow_empty_password(false)
            .interact()
            .context("Failed to read access key")?,
    };

    save_credentials(&path, &Credentials::new(access_id.trim(), access_key))
        .with_context(|| format!("Failed to save credentials to {}", path.display()))?;

    eprintln!("Credentials saved to {}", path.display());
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
