//! Mapping of transport failures and HTTP statuses onto `ApiError`

use std::io::ErrorKind;

use serde_json::Value;

use crate::error::ApiError;

pub(crate) fn classify_transport(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Timeout(_) => ApiError::Timeout,
        ureq::Error::Io(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
            ApiError::Timeout
        }
        ureq::Error::Io(e) => ApiError::Network {
            detail: e.to_string(),
        },
        other @ (ureq::Error::HostNotFound | ureq::Error::ConnectionFailed) => {
            ApiError::Network {
                detail: other.to_string(),
            }
        }
        ureq::Error::StatusCode(status) => classify_status(status, None),
        other => ApiError::Unknown {
            detail: other.to_string(),
        },
    }
}

/// Non-2xx status; `body` is used for the `message` of client errors
pub(crate) fn classify_status(status: u16, body: Option<&str>) -> ApiError {
    if status >= 500 {
        return ApiError::Server { status };
    }
    let message = body
        .and_then(|b| serde_json::from_str::<Value>(b).ok())
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string));
    ApiError::Http { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_statuses() {
        assert!(matches!(classify_status(500, None), ApiError::Server { status: 500 }));
        assert!(matches!(
            classify_status(503, Some("{}")),
            ApiError::Server { status: 503 }
        ));
    }

    #[test]
    fn client_status_uses_body_message() {
        let e = classify_status(404, Some(r#"{"message":"Not found here"}"#));
        assert_eq!(e.user_message(), "Not found here");

        let e = classify_status(400, Some("plain text"));
        assert_eq!(e.user_message(), "Request failed (400)");
    }

    #[test]
    fn io_errors() {
        let timed_out = ureq::Error::Io(std::io::Error::new(ErrorKind::TimedOut, "slow"));
        assert!(matches!(classify_transport(timed_out), ApiError::Timeout));

        let refused = ureq::Error::Io(std::io::Error::new(ErrorKind::ConnectionRefused, "refused"));
        assert!(matches!(classify_transport(refused), ApiError::Network { .. }));

        assert!(matches!(
            classify_transport(ureq::Error::HostNotFound),
            ApiError::Network { .. }
        ));
    }

    #[test]
    fn status_code_error() {
        assert!(matches!(
            classify_transport(ureq::Error::StatusCode(502)),
            ApiError::Server { status: 502 }
        ));
    }
}
