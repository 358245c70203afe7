use std::path::PathBuf;

use thiserror::Error;

/// Failures of a backend call, transport or application level
#[derive(Debug, Error)]
pub(crate) enum ApiError {
    #[error("request timed out")]
    Timeout,

    #[error("network unreachable: {detail}")]
    Network { detail: String },

    #[error("server error (HTTP {status})")]
    Server { status: u16 },

    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("request failed"))]
    Http { status: u16, message: Option<String> },

    #[error("application error {code}: {message}")]
    Application { code: i64, message: String },

    #[error("unauthenticated: {message}")]
    Unauthenticated { message: String },

    #[error("invalid response: {detail}")]
    InvalidResponse { detail: String },

    #[error("request cancelled")]
    Cancelled,

    #[error("{detail}")]
    Unknown { detail: String },
}

impl ApiError {
    /// Text shown to the user in the error notification
    pub(crate) fn user_message(&self) -> String {
        match self {
            ApiError::Timeout => "Request timed out, please try again later".to_string(),
            ApiError::Network { .. } => {
                "Network connection failed, please check your network".to_string()
            }
            ApiError::Server { status: 503 } => {
                "Service temporarily unavailable, please try again later".to_string()
            }
            ApiError::Server { .. } => "Server error, please try again later".to_string(),
            ApiError::Http { status, message } => match message {
                Some(m) if !m.is_empty() => m.clone(),
                _ => format!("Request failed ({status})"),
            },
            ApiError::Application { message, .. } | ApiError::Unauthenticated { message } => {
                message.clone()
            }
            ApiError::InvalidResponse { .. } => "Request failed".to_string(),
            ApiError::Cancelled => "Request cancelled".to_string(),
            ApiError::Unknown { detail } if !detail.is_empty() => detail.clone(),
            ApiError::Unknown { .. } => "Network error".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum StorageError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Corrupt storage file {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to encode value for \"{key}\": {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub(crate) enum AppError {
    /// Already surfaced through the notifier by the request pipeline
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Streaming request failed: {0}")]
    Stream(ApiError),

    #[error("Streaming request failed (HTTP {status})")]
    StreamStatus { status: u16 },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Not logged in. Run `legalqa login` first.")]
    NotLoggedIn,

    #[error("Access denied: {path} requires an administrator account")]
    Forbidden { path: String },
}

impl AppError {
    /// Whether the user has already seen this error
    pub(crate) fn already_reported(&self) -> bool {
        matches!(self, AppError::Api(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message() {
        assert_eq!(
            ApiError::Timeout.user_message(),
            "Request timed out, please try again later"
        );
    }

    #[test]
    fn server_messages_distinguish_unavailable() {
        assert_eq!(
            ApiError::Server { status: 503 }.user_message(),
            "Service temporarily unavailable, please try again later"
        );
        assert_eq!(
            ApiError::Server { status: 502 }.user_message(),
            "Server error, please try again later"
        );
    }

    #[test]
    fn http_message_prefers_body_message() {
        let e = ApiError::Http {
            status: 404,
            message: Some("No such article".to_string()),
        };
        assert_eq!(e.user_message(), "No such article");

        let e = ApiError::Http {
            status: 404,
            message: None,
        };
        assert_eq!(e.user_message(), "Request failed (404)");
        assert_eq!(e.to_string(), "HTTP 404: request failed");
    }

    #[test]
    fn unknown_falls_back_to_network_error() {
        let e = ApiError::Unknown {
            detail: String::new(),
        };
        assert_eq!(e.user_message(), "Network error");
    }

    #[test]
    fn storage_error_display() {
        let e = StorageError::Write {
            path: PathBuf::from("/tmp/storage.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(e.to_string(), "Failed to write /tmp/storage.json: denied");
    }

    #[test]
    fn api_errors_are_already_reported() {
        let app: AppError = ApiError::Timeout.into();
        assert!(app.already_reported());
        assert!(!AppError::NotLoggedIn.already_reported());
        assert!(!AppError::Stream(ApiError::Timeout).already_reported());
    }
}
