//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Define error variants for all configuration loading failures.
//!
//! Does NOT handle:
//! - Errors writing the credentials file (those surface as `anyhow::Error` from `persistence`).
//!
//! Invariants:
//! - All error variants include context for debugging (variable names, paths, etc.).
//! - Dotenv and credentials file errors NEVER include raw file contents to prevent secret leakage.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Endpoint is required. Set SUMOLOGIC_ENDPOINT or pass --endpoint.")]
    MissingEndpoint,

    #[error(
        "Credentials are required. Set SUMOLOGIC_ACCESS_ID and SUMOLOGIC_ACCESS_KEY or run `sumo-cli setup`."
    )]
    MissingCredentials,

    #[error("Unable to determine config directory: {0}")]
    ConfigDirUnavailable(String),

    #[error("Failed to read credentials file at {path}: {kind}")]
    CredentialsFileRead { path: PathBuf, kind: ErrorKind },

    #[error("Failed to parse credentials file at {path}")]
    CredentialsFileParse { path: PathBuf },

    #[error("invalid timeout: {message}")]
    InvalidTimeout { message: String },

    #[error("invalid max_retries: {message}")]
    InvalidMaxRetries { message: String },

    #[error("invalid polling configuration: {message}")]
    InvalidPolling { message: String },

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: only the byte index of the failure is kept, never the line.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}
