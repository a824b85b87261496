use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum BootstrapError {
    /// Any failure of the record store's count or insert operations.
    #[error("Storage failure: {0}")]
    Storage(#[from] SqlxError),

    #[error("Admin username already taken: {0}")]
    Conflict(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl BootstrapError {
    /// True for the single storage failure kind the seeder surfaces to its caller.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, BootstrapError::Storage(_))
    }
}

impl From<figment::Error> for BootstrapError {
    fn from(e: figment::Error) -> Self {
        BootstrapError::Config(Box::new(e))
    }
}

impl From<argon2::password_hash::Error> for BootstrapError {
    fn from(e: argon2::password_hash::Error) -> Self {
        BootstrapError::PasswordHash(e.to_string())
    }
}
