use thiserror::Error;

/// Failure taxonomy for backend calls. Every controller catches these at its
/// boundary and turns them into a user-visible notification; none of them is
/// allowed to crash a screen.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Upstream { status: u16, message: String },
}

impl ApiError {
    /// Map a non-2xx response to the taxonomy. `message` is the backend's
    /// own error text when it sent one, so conflict and not-found messages
    /// reach the user verbatim.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => ApiError::Auth(message),
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            400 | 422 => ApiError::BadRequest(message),
            _ => ApiError::Upstream { status, message },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// Text suitable for direct display. Backend-provided messages pass
    /// through verbatim; transport and unclassified failures collapse to a
    /// generic retryable message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Auth(msg)
            | ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::Validation(msg) => {
                if msg.is_empty() {
                    "Something went wrong. Please try again.".to_string()
                } else {
                    msg.clone()
                }
            }
            ApiError::Network(_) | ApiError::Upstream { .. } => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}
