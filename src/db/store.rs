use crate::db::models::NewAdmin;
use crate::error::BootstrapError;
use std::future::Future;

/// Result of a conditional insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(i64),
    /// A record with the same username already exists; nothing was written.
    AlreadyPresent,
}

/// Persistence collaborator scoped to administrator records.
///
/// Implementations report every backend failure as `BootstrapError::Storage`,
/// except a duplicate username on `insert`, which is `BootstrapError::Conflict`.
pub trait AdminStore: Send + Sync {
    /// Total number of administrator records.
    fn count(&self) -> impl Future<Output = Result<i64, BootstrapError>> + Send;

    /// Unconditional insert. Returns the new row id.
    fn insert(&self, admin: NewAdmin)
    -> impl Future<Output = Result<i64, BootstrapError>> + Send;

    /// Insert unless the username is already taken, atomically.
    fn insert_if_absent(
        &self,
        admin: NewAdmin,
    ) -> impl Future<Output = Result<InsertOutcome, BootstrapError>> + Send;
}
