//! API errors.

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while talking to the canteen backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure before a response arrived.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status {
        /// HTTP status code
        status: u16,

        /// Human readable message for the user
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response body")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// Build a status error from a failed response body.
    #[must_use]
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        Self::Status {
            status,
            message: status_message(status, body),
        }
    }

    /// HTTP status, when the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(error) => error.status().map(|status| status.as_u16()),
            Self::Decode(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// The body's `detail` when present, otherwise a generic status message.
#[must_use]
pub fn status_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.detail)
        .filter(|detail| !detail.trim().is_empty())
        .unwrap_or_else(|| format!("API Error: {status}"))
}
