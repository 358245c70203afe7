use std::time::Duration;

/// Envelope `code` signalling success
pub(crate) const SUCCESS_CODE: i64 = 200;

/// Envelope `code` signalling a missing or rejected credential
pub(crate) const UNAUTHENTICATED_CODE: i64 = 401;

/// Durable storage key holding the bearer token
pub(crate) const TOKEN_KEY: &str = "token";

/// Durable storage key holding the JSON-serialized user profile
pub(crate) const PROFILE_KEY: &str = "userInfo";

/// `userType` value carried by administrator profiles
pub(crate) const ADMIN_USER_TYPE: i64 = 1;

/// Answers can take a while to generate upstream, hence the generous bound
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

pub(crate) const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

pub(crate) const STREAM_PATH: &str = "/qa/ask/stream";

/// Overrides the directory holding `config.toml` and `storage.json`
pub(crate) const HOME_ENV: &str = "LEGALQA_HOME";

/// Timestamp format used in tables: "2025-01-15 09:30"
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";
