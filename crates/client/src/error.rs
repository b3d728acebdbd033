//! Error types for the Sumo Logic client.

use std::sync::Arc;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during Sumo Logic client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connect, timeout, TLS, body read).
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Unexpected HTTP status from the API, including a non-202 job submission.
    #[error("API error ({status}) at {url}: {message}{}", .request_id.as_ref().map(|id| format!(" [Request ID: {id}]")).unwrap_or_default())]
    ApiError {
        status: u16,
        url: String,
        message: String,
        request_id: Option<String>,
    },

    /// Response body could not be decoded.
    #[error("Unable to decode response: {0}")]
    InvalidResponse(String),

    /// The job status endpoint reported a state this client does not know.
    #[error("Unknown search job state: {0:?}")]
    UnknownJobState(String),

    /// The metrics endpoint answered 2xx with only an error payload.
    #[error("Metrics query {id} failed:\n{message}")]
    MetricsQueryFailed { id: String, message: String },

    /// Retries for a transient status were exhausted.
    #[error("Maximum retries exceeded ({0} attempts): {1}")]
    MaxRetriesExceeded(usize, Box<ClientError>),

    /// Invalid endpoint URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Access id/key were not provided to the builder.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// A request payload could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failure of a request this caller was coalesced onto.
    #[error(transparent)]
    Shared(Arc<ClientError>),
}

impl ClientError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpError(e) => e.is_timeout() || e.is_connect(),
            Self::ApiError { status, .. } => Self::is_retryable_status(*status),
            Self::Shared(inner) => inner.is_retryable(),
            _ => false,
        }
    }

    /// Check if an HTTP status code is retryable.
    ///
    /// Retryable status codes:
    /// - 429: Too Many Requests (rate limiting)
    /// - 502: Bad Gateway (transient server error)
    /// - 503: Service Unavailable (transient server error)
    /// - 504: Gateway Timeout (transient server error)
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(status, 429 | 502 | 503 | 504)
    }

    /// Check if this error indicates rejected credentials.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Self::ApiError { status, .. } => *status == 401,
            Self::MissingCredentials(_) => true,
            Self::MaxRetriesExceeded(_, inner) => inner.is_auth_error(),
            Self::Shared(inner) => inner.is_auth_error(),
            _ => false,
        }
    }

    /// The underlying error, looking through [`ClientError::Shared`].
    pub fn root(&self) -> &ClientError {
        match self {
            Self::Shared(inner) => inner.root(),
            other => other,
        }
    }

    /// Recover an owned error from one shared between coalesced callers.
    pub(crate) fn from_shared(shared: Arc<ClientError>) -> Self {
        Arc::try_unwrap(shared).unwrap_or_else(ClientError::Shared)
    }
}
