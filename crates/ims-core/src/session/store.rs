use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{LocalStorage, SessionError};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

/// Snapshot of the persisted session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<Value>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Typed accessors for the fixed session keys.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: LocalStorage,
}

fn as_token(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

impl SessionStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn open_default() -> Result<Self, SessionError> {
        Ok(Self::new(LocalStorage::open_default()?))
    }

    pub fn in_memory() -> Self {
        Self::new(LocalStorage::in_memory())
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    pub fn access_token(&self) -> Result<Option<String>, SessionError> {
        Ok(as_token(self.storage.get_item(ACCESS_TOKEN_KEY)?))
    }

    pub fn refresh_token(&self) -> Result<Option<String>, SessionError> {
        Ok(as_token(self.storage.get_item(REFRESH_TOKEN_KEY)?))
    }

    pub fn current(&self) -> Result<Session, SessionError> {
        Ok(Session {
            access_token: self.access_token()?,
            refresh_token: self.refresh_token()?,
            user: self.storage.get_item(USER_KEY)?.filter(|v| !v.is_null()),
        })
    }

    /// Persist a new token pair; the refresh token is kept when the server didn't rotate it.
    pub fn set_tokens(&self, access: &str, refresh: Option<&str>) -> Result<(), SessionError> {
        let mut items = vec![(ACCESS_TOKEN_KEY, Value::String(access.to_string()))];
        if let Some(refresh) = refresh {
            items.push((REFRESH_TOKEN_KEY, Value::String(refresh.to_string())));
        }
        self.storage.set_items(items)
    }

    pub fn set_user(&self, user: Value) -> Result<(), SessionError> {
        self.storage.set_item(USER_KEY, user)
    }

    /// Forget tokens and user (logout, or an unrecoverable auth failure).
    pub fn clear(&self) -> Result<(), SessionError> {
        tracing::debug!("clearing persisted session");
        self.storage.clear()
    }
}
