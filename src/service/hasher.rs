use crate::config::SeedSettings;
use crate::error::BootstrapError;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Turns a password into the credential string stored on an admin record.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, BootstrapError>;

    fn verify(&self, password: &str, stored: &str) -> bool;

    /// Whether `hash` output can be handed out verbatim without leaking a secret.
    fn is_plaintext(&self) -> bool {
        false
    }
}

/// Salted Argon2id, PHC string output.
#[derive(Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, BootstrapError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(self
            .argon2
            .hash_password(password.as_bytes(), &salt)?
            .to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Stores the password unchanged. Only selected when
/// `seed.allow_plaintext_password` is set.
pub struct PlaintextHasher;

impl CredentialHasher for PlaintextHasher {
    fn hash(&self, password: &str) -> Result<String, BootstrapError> {
        Ok(password.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        password.as_bytes().ct_eq(stored.as_bytes()).into()
    }

    fn is_plaintext(&self) -> bool {
        true
    }
}

/// Argon2 unless the settings explicitly opt into plaintext storage.
pub fn hasher_for(settings: &SeedSettings) -> Arc<dyn CredentialHasher> {
    if settings.allow_plaintext_password {
        Arc::new(PlaintextHasher)
    } else {
        Arc::new(Argon2Hasher::new())
    }
}
