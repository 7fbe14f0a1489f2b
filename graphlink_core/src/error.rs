// src/error.rs
use serde::{Deserialize, Serialize};

/// Machine-readable classification for every failure envelope this crate
/// can produce. Serialized in SCREAMING_SNAKE_CASE to match the wire shape
/// consuming applications branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    AccountNotFound,
    NoAccessToken,
    TokenExpired,
    InvalidScopes,
    GraphApiError,
    NetworkError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AccountNotFound => "ACCOUNT_NOT_FOUND",
            ErrorCode::NoAccessToken => "NO_ACCESS_TOKEN",
            ErrorCode::TokenExpired => "TOKEN_EXPIRED",
            ErrorCode::InvalidScopes => "INVALID_SCOPES",
            ErrorCode::GraphApiError => "GRAPH_API_ERROR",
            ErrorCode::NetworkError => "NETWORK_ERROR",
        }
    }

    /// Canonical human-readable message for each code.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::AccountNotFound => "Microsoft account not found for user",
            ErrorCode::NoAccessToken => "No Microsoft access token found in account",
            ErrorCode::TokenExpired => "Microsoft access token expired or invalid",
            ErrorCode::InvalidScopes => "Access token missing required scopes",
            ErrorCode::GraphApiError => "Microsoft Graph API error",
            ErrorCode::NetworkError => "Network error communicating with Microsoft Graph",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error half of a result envelope. Plain data, never raised: callers
/// always receive it inside a [`GraphResult`](crate::executor::GraphResult).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphError {
    pub code: ErrorCode,
    pub message: String,
}

impl GraphError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// An error carrying the code's canonical message.
    pub fn coded(code: ErrorCode) -> Self {
        Self::new(code, code.message())
    }
}

/// Rejection for malformed query refinements (out-of-range paging values).
/// Unknown fields are rejected earlier, at deserialization time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("$top must be between 1 and {max}")]
    TopOutOfRange { max: u32 },
    #[error("invalid query options: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_serialize_in_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorCode::AccountNotFound).unwrap();
        assert_eq!(json, "\"ACCOUNT_NOT_FOUND\"");
        let json = serde_json::to_string(&ErrorCode::NetworkError).unwrap();
        assert_eq!(json, "\"NETWORK_ERROR\"");
    }

    #[test]
    fn coded_error_uses_canonical_message() {
        let err = GraphError::coded(ErrorCode::NoAccessToken);
        assert_eq!(err.message, "No Microsoft access token found in account");
        assert_eq!(err.code.as_str(), "NO_ACCESS_TOKEN");
    }
}
