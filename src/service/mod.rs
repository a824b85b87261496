pub mod hasher;
pub mod lifecycle;
pub mod seeder;

pub use hasher::{Argon2Hasher, CredentialHasher, PlaintextHasher, hasher_for};
pub use lifecycle::{Lifecycle, Readiness, StartupTask};
pub use seeder::{SeedAdminTask, SeedOutcome, ensure_default_admin};
