//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map ClientError variants to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//! - Signal handling (see cancellation.rs for SIGINT handling).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + SIGINT).

use sumo_client::ClientError;
use sumo_config::ConfigError;

/// Structured exit codes for sumo-cli.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,

    /// Unhandled or generic failure.
    GeneralError = 1,

    /// Access id/key rejected (HTTP 401) or missing.
    AuthenticationFailed = 2,

    /// Network, timeout, or DNS failure.
    ///
    /// Scripts may retry with exponential backoff.
    ConnectionError = 3,

    /// HTTP 404, usually an expired or unknown job id.
    NotFound = 4,

    /// The backend rejected the query or time range (HTTP 400).
    ///
    /// Scripts should fix the input and not retry the same request.
    ValidationError = 5,

    /// HTTP 403.
    PermissionDenied = 6,

    /// HTTP 429 after retries were exhausted.
    RateLimited = 7,

    /// HTTP 502/503/504.
    ServiceUnavailable = 8,

    /// The backend answered with something this client cannot interpret:
    /// an unknown job state or an undecodable body.
    ProtocolError = 9,

    /// SIGINT/Ctrl+C (128 + 2).
    Interrupted = 130,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }

    /// Returns true if this exit code indicates a retryable condition.
    #[allow(dead_code)]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            ExitCode::ConnectionError | ExitCode::RateLimited | ExitCode::ServiceUnavailable
        )
    }
}

impl From<&ClientError> for ExitCode {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::MissingCredentials(_) => ExitCode::AuthenticationFailed,
            ClientError::InvalidUrl(_) => ExitCode::ConnectionError,

            ClientError::ApiError { status, .. } => match *status {
                400 => ExitCode::ValidationError,
                401 => ExitCode::AuthenticationFailed,
                403 => ExitCode::PermissionDenied,
                404 => ExitCode::NotFound,
                429 => ExitCode::RateLimited,
                502..=504 => ExitCode::ServiceUnavailable,
                _ => ExitCode::GeneralError,
            },

            ClientError::MetricsQueryFailed { .. } => ExitCode::ValidationError,

            ClientError::UnknownJobState(_) | ClientError::InvalidResponse(_) => {
                ExitCode::ProtocolError
            }

            ClientError::MaxRetriesExceeded(_, inner) => Self::from(inner.as_ref()),
            ClientError::Shared(inner) => Self::from(inner.as_ref()),

            ClientError::HttpError(e) => {
                if e.is_connect() || e.is_timeout() {
                    ExitCode::ConnectionError
                } else {
                    ExitCode::GeneralError
                }
            }

            ClientError::Serialization(_) => ExitCode::GeneralError,
        }
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::MissingCredentials => ExitCode::AuthenticationFailed,
            _ => ExitCode::GeneralError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns ExitCode::GeneralError if no known error is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(client_err) = cause.downcast_ref::<ClientError>() {
                return ExitCode::from(client_err);
            }
            if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
                return ExitCode::from(config_err);
            }
        }

        ExitCode::GeneralError
    }
}
