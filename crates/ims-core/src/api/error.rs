use thiserror::Error;

use crate::session::SessionError;
use crate::validation::ValidationError;

/// The request never produced an HTTP response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    #[error("{0}")]
    Other(String),
}

/// Classified failure of a backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Rejected by field validation, either locally before sending or by the backend (HTTP 400).
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Non-2xx response that isn't a validation or auth failure.
    #[error("HTTP {status}: {message}")]
    Status { status: u32, message: String },
    /// The session is gone or could not be refreshed; the user must log in again.
    #[error("session expired, please log in again")]
    LoginRequired,
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("request task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> Option<u32> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Validation(_) => Some(400),
            ApiError::LoginRequired => Some(401),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
