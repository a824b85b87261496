pub mod config;
pub mod db;
pub mod error;
pub mod service;

pub use config::{Config, SeedSettings};
pub use error::BootstrapError;
pub use service::seeder::{SeedOutcome, ensure_default_admin};
