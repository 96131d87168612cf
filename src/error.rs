// Client-side error types
use serde_json::Value;
use thiserror::Error;

use crate::navigation::RouteError;
use crate::session::StorageError;

/// Failure talking to the remote service.
///
/// HTTP failures are sorted by status the same way the service reports them,
/// so callers can react to `Unauthorized` without inspecting codes.
#[derive(Debug, Error)]
pub enum ClientError {
    // 400
    #[error("Bad request: {0}")]
    BadRequest(String),

    // 401
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // 403
    #[error("Forbidden: {0}")]
    Forbidden(String),

    // 404
    #[error("Not found: {0}")]
    NotFound(String),

    // 409
    #[error("Conflict: {0}")]
    Conflict(String),

    // 422
    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    // 429
    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    // 5xx and anything unexpected
    #[error("Remote error {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Invalid remote address: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Map a non-success status and its body to an error
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = Self::extract_message(body).unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {}", status)
            } else {
                body.trim().to_string()
            }
        });

        match status {
            400 => ClientError::BadRequest(message),
            401 => ClientError::Unauthorized(message),
            403 => ClientError::Forbidden(message),
            404 => ClientError::NotFound(message),
            409 => ClientError::Conflict(message),
            422 => ClientError::UnprocessableEntity(message),
            429 => ClientError::TooManyRequests(message),
            _ => ClientError::Remote { status, message },
        }
    }

    /// `{"message": ...}` or `{"error": "..."}`, whichever the service sent
    fn extract_message(body: &str) -> Option<String> {
        let json: Value = serde_json::from_str(body).ok()?;
        json.get("message")
            .and_then(Value::as_str)
            .or_else(|| json.get("error").and_then(Value::as_str))
            .map(str::to_string)
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::BadRequest(_) => Some(400),
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Forbidden(_) => Some(403),
            ClientError::NotFound(_) => Some(404),
            ClientError::Conflict(_) => Some(409),
            ClientError::UnprocessableEntity(_) => Some(422),
            ClientError::TooManyRequests(_) => Some(429),
            ClientError::Remote { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            ClientError::InvalidUrl(_) | ClientError::Decode(_) => None,
        }
    }

    /// Stable code for `--json` output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::BadRequest(_) => "BAD_REQUEST",
            ClientError::Unauthorized(_) => "UNAUTHORIZED",
            ClientError::Forbidden(_) => "FORBIDDEN",
            ClientError::NotFound(_) => "NOT_FOUND",
            ClientError::Conflict(_) => "CONFLICT",
            ClientError::UnprocessableEntity(_) => "UNPROCESSABLE_ENTITY",
            ClientError::TooManyRequests(_) => "TOO_MANY_REQUESTS",
            ClientError::Remote { .. } => "REMOTE_ERROR",
            ClientError::InvalidUrl(_) => "INVALID_URL",
            ClientError::Decode(_) => "DECODE_ERROR",
            ClientError::Transport(_) => "TRANSPORT_ERROR",
        }
    }

    /// The remote rejected our credential
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }
}

/// Errors assembling the client at startup
#[derive(Debug, Error)]
pub enum BootError {
    #[error("Invalid navigation table: {0}")]
    Routes(#[from] RouteError),

    #[error("Cannot open local storage: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Client(#[from] ClientError),
}
