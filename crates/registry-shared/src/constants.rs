//! Application-wide constants

/// Header carrying the access token. Lowercase, as `HeaderName::from_static` requires.
pub const TOKEN_HEADER: &str = "token";
pub const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 1800;
pub const DEFAULT_TOKEN_CLIENT: &str = "client";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILTER: &str = "info,registry=debug,tower_http=info";

/// Delimiter that introduces a mention inside notification text.
pub const MENTION_DELIMITER: &str = " @";
