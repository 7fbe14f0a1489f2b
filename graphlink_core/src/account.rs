// src/account.rs
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Provider id under which Microsoft credentials are stored.
pub const MICROSOFT_PROVIDER_ID: &str = "microsoft";

/// One external-provider credential binding for a local user. Created and
/// refreshed by the host's OAuth flow; read-only from this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedAccount {
    pub user_id: String,
    pub provider_id: String,
    pub access_token: Option<String>,
}

impl LinkedAccount {
    pub fn new(user_id: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            provider_id: provider_id.into(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

/// Opaque lookup over the host's account table. Both fields are matched by
/// exact equality; the first match wins. At most one record should satisfy
/// (user_id, provider_id) for correct operation.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_one(&self, user_id: &str, provider_id: &str) -> Option<LinkedAccount>;
}

/// A simple in-memory store, mainly for testing and the CLI.
pub struct MemoryAccountStore {
    accounts: std::sync::Mutex<Vec<LinkedAccount>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn insert(&self, account: LinkedAccount) {
        if let Ok(mut accounts) = self.accounts.lock() {
            accounts.push(account);
        }
    }
}

impl Default for MemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_one(&self, user_id: &str, provider_id: &str) -> Option<LinkedAccount> {
        self.accounts
            .lock()
            .ok()?
            .iter()
            .find(|a| a.user_id == user_id && a.provider_id == provider_id)
            .cloned()
    }
}
