// src/session.rs
use serde::{Deserialize, Serialize};

/// The authenticated caller's identity, established upstream by the host
/// application's session middleware. This crate only reads it; a session
/// without a user id stops every request before any network call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Option<String>,
}

impl Session {
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { user_id: None }
    }
}
