use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An administrator row as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DbAdmin {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// An administrator record ready for insertion. `password` is whatever the
/// configured hasher produced.
#[derive(Clone, PartialEq)]
pub struct NewAdmin {
    pub username: String,
    pub password: String,
}

impl NewAdmin {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for NewAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAdmin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
