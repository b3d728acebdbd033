use std::path::Path;

use anyhow::{Context, Result};

use crate::loader::ConfigError;
use crate::types::Credentials;

/// Read a credentials file.
///
/// Parse errors never echo file contents.
pub(crate) fn read_credentials(path: &Path) -> std::result::Result<Credentials, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CredentialsFileRead {
        path: path.to_path_buf(),
        kind: e.kind(),
    })?;

    serde_json::from_str(&content).map_err(|_| ConfigError::CredentialsFileParse {
        path: path.to_path_buf(),
    })
}

/// Write credentials to `path`, creating parent directories as needed.
pub fn save_credentials(path: &Path, credentials: &Credentials) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let temp_path = path.with_extension("tmp");
    let content = serde_json::to_string_pretty(credentials)?;
    std::fs::write(&temp_path, content).context("Failed to write temporary credentials file")?;
    restrict_permissions(&temp_path)?;

    std::fs::rename(&temp_path, path).context("Failed to move credentials file into place")?;

    tracing::debug!(path = %path.display(), "Credentials saved atomically");
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .context("Failed to restrict credentials file permissions")
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_read_credentials() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        save_credentials(&path, &Credentials::new("suID", "s3cret")).unwrap();
        assert!(!path.with_extension("tmp").exists());

        let creds = read_credentials(&path).unwrap();
        assert_eq!(creds.access_id, "suID");
        assert_eq!(creds.access_key.expose_secret(), "s3cret");
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        save_credentials(&path, &Credentials::new("suID", "s3cret")).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_parse_error_does_not_leak_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "access_key=leaky-secret").unwrap();

        let err = read_credentials(&path).unwrap_err();
        assert!(matches!(err, ConfigError::CredentialsFileParse { .. }));
        assert!(!err.to_string().contains("leaky-secret"));
    }
}
