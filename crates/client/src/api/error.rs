use reqwest::StatusCode;
use serde::Deserialize;

/// Error body the server attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
struct ServerError {
    detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("Status {}: {}", .status.as_u16(), .message)]
    Http { status: StatusCode, message: String },
}

/// Coarse classification of an [`ApiError`], derived from the HTTP
/// status code so callers can branch without matching on raw codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 404: bucket, entry or record does not exist.
    NotFound,
    /// 409: the resource already exists.
    Conflict,
    /// 422: the server rejected a timestamp range.
    InvalidRange,
    /// 5xx.
    ServerFault,
    /// Connection-level failure (DNS, refused connection, timeout).
    Transport,
    /// Any other HTTP status.
    Unknown,
}

impl ApiError {
    /// Build the typed error for a non-2xx response.
    ///
    /// The server reports failures as JSON `{"detail": "<message>"}`;
    /// an empty body maps to an empty message.
    pub(crate) fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let message = if body.is_empty() {
            String::new()
        } else {
            serde_json::from_slice::<ServerError>(body)
                .map(|err| err.detail)
                .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned())
        };
        ApiError::Http { status, message }
    }

    /// HTTP status code, if the failure got as far as a response.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status(),
            ApiError::UrlParse(_) => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Http { status, .. } => match status.as_u16() {
                404 => ErrorKind::NotFound,
                409 => ErrorKind::Conflict,
                422 => ErrorKind::InvalidRange,
                500..=599 => ErrorKind::ServerFault,
                _ => ErrorKind::Unknown,
            },
            ApiError::Transport(_) | ApiError::UrlParse(_) => ErrorKind::Transport,
        }
    }
}
