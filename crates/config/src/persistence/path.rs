//! Path helpers for the credentials file location.

use std::path::PathBuf;

use anyhow::Context;

/// Returns the default path to the credentials file:
/// - Linux: `~/.config/sumo-cli/credentials.json`
/// - macOS: `~/Library/Application Support/sumo-cli/credentials.json`
/// - Windows: `%AppData%\sumo-cli\config\credentials.json`
pub fn default_credentials_path() -> Result<PathBuf, anyhow::Error> {
    let proj_dirs = directories::ProjectDirs::from("", "", "sumo-cli")
        .context("Failed to determine project directories")?;

    Ok(proj_dirs.config_dir().join("credentials.json"))
}
