use serde::Deserialize;
use serde_json::Value;

use crate::consts::{SUCCESS_CODE, UNAUTHENTICATED_CODE};
use crate::error::ApiError;

const FALLBACK_MESSAGE: &str = "Request failed";

/// `{ code, message, data }` wrapper carried by every non-streaming response
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    code: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Value,
}

impl Envelope {
    pub(crate) fn parse(text: &str) -> Result<Self, ApiError> {
        serde_json::from_str(text).map_err(|e| ApiError::InvalidResponse {
            detail: e.to_string(),
        })
    }

    /// `data` untouched on success, otherwise the matching application error
    pub(crate) fn into_result(self) -> Result<Value, ApiError> {
        if self.code == SUCCESS_CODE {
            return Ok(self.data);
        }
        let message = self
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        if self.code == UNAUTHENTICATED_CODE {
            Err(ApiError::Unauthenticated { message })
        } else {
            Err(ApiError::Application {
                code: self.code,
                message,
            })
        }
    }
}
