//! Layered configuration: built-in defaults, then `config.toml`, then
//! `ADMIN_BOOTSTRAP_*` environment variables (`__` separates nested keys,
//! e.g. `ADMIN_BOOTSTRAP_SEED__DEFAULT_USERNAME`).

use crate::error::BootstrapError;
use argon2::password_hash::PasswordHash;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "ADMIN_BOOTSTRAP_";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database_url: String,
    pub loglevel: String,
    pub seed: SeedSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://data.sqlite".to_string(),
            loglevel: "info".to_string(),
            seed: SeedSettings::default(),
        }
    }
}

impl Config {
    /// Load from the default provider chain and validate.
    pub fn load() -> Result<Self, BootstrapError> {
        Self::from_figment(Self::figment())
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, BootstrapError> {
        let cfg: Config = figment.extract()?;
        cfg.seed.validate()?;
        Ok(cfg)
    }
}

/// Credentials used when the admin table is found empty at startup.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeedSettings {
    pub default_username: String,
    /// Pre-computed PHC hash string, stored as-is.
    pub default_password_hash: Option<String>,
    /// Store the fallback password verbatim instead of hashing it.
    pub allow_plaintext_password: bool,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            default_username: "admin".to_string(),
            default_password_hash: None,
            allow_plaintext_password: false,
        }
    }
}

impl std::fmt::Debug for SeedSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedSettings")
            .field("default_username", &self.default_username)
            .field(
                "default_password_hash",
                &self.default_password_hash.as_ref().map(|_| "<redacted>"),
            )
            .field("allow_plaintext_password", &self.allow_plaintext_password)
            .finish()
    }
}

impl SeedSettings {
    pub fn validate(&self) -> Result<(), BootstrapError> {
        if self.default_username.trim().is_empty() {
            return Err(BootstrapError::InvalidConfig(
                "seed.default_username cannot be empty".to_string(),
            ));
        }
        if let Some(hash) = self.default_password_hash.as_deref() {
            PasswordHash::new(hash).map_err(|e| {
                BootstrapError::InvalidConfig(format!(
                    "seed.default_password_hash is not a valid PHC string: {e}"
                ))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_seed_admin_username() {
        let cfg = Config::from_figment(Figment::from(Serialized::defaults(Config::default())))
            .expect("defaults are valid");
        assert_eq!(cfg.seed.default_username, "admin");
        assert_eq!(cfg.seed.default_password_hash, None);
        assert!(!cfg.seed.allow_plaintext_password);
        assert_eq!(cfg.loglevel, "info");
    }

    #[test]
    fn toml_overrides_nested_seed_settings() {
        let figment = Figment::from(Serialized::defaults(Config::default())).merge(Toml::string(
            r#"
            database_url = "sqlite::memory:"

            [seed]
            default_username = "root"
            allow_plaintext_password = true
            "#,
        ));
        let cfg = Config::from_figment(figment).expect("valid config");
        assert_eq!(cfg.database_url, "sqlite::memory:");
        assert_eq!(cfg.seed.default_username, "root");
        assert!(cfg.seed.allow_plaintext_password);
    }

    #[test]
    fn empty_username_is_rejected() {
        let settings = SeedSettings {
            default_username: "   ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(BootstrapError::InvalidConfig(_))
        ));
    }

    #[test]
    fn malformed_password_hash_is_rejected() {
        let settings = SeedSettings {
            default_password_hash: Some("not a hash".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(BootstrapError::InvalidConfig(_))
        ));
    }

    #[test]
    fn debug_output_redacts_password_hash() {
        let settings = SeedSettings {
            default_password_hash: Some("$argon2id$v=19$secret".to_string()),
            ..Default::default()
        };
        let out = format!("{settings:?}");
        assert!(out.contains("<redacted>"));
        assert!(!out.contains("secret"));
    }
}
