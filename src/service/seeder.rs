use crate::config::SeedSettings;
use crate::db::models::NewAdmin;
use crate::db::store::{AdminStore, InsertOutcome};
use crate::error::BootstrapError;
use crate::service::hasher::CredentialHasher;
use crate::service::lifecycle::StartupTask;
use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::{info, warn};

/// Password hashed into the seed record when no `default_password_hash` is configured.
pub const FALLBACK_PASSWORD: &str = "admin";

pub const CREATED_MESSAGE: &str = "Default Admin Created Successfully!";
pub const SKIPPED_MESSAGE: &str = "Admin already exists. Skipping creation.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store was empty and the default admin was written.
    Created { id: i64, username: String },
    /// The store already held `existing` admins; nothing was written.
    Skipped { existing: i64 },
    /// The store looked empty but another writer seeded the same username first.
    AlreadySeeded { username: String },
}

impl SeedOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            SeedOutcome::Created { .. } => CREATED_MESSAGE,
            SeedOutcome::Skipped { .. } | SeedOutcome::AlreadySeeded { .. } => SKIPPED_MESSAGE,
        }
    }

    pub fn created(&self) -> bool {
        matches!(self, SeedOutcome::Created { .. })
    }
}

/// Build the seed record from settings. A configured hash is stored as-is;
/// otherwise the fallback password goes through `hasher`.
pub fn default_admin<H>(settings: &SeedSettings, hasher: &H) -> Result<NewAdmin, BootstrapError>
where
    H: CredentialHasher + ?Sized,
{
    let password = match settings.default_password_hash.as_deref() {
        Some(hash) => hash.to_string(),
        None => {
            if hasher.is_plaintext() {
                warn!(
                    username = %settings.default_username,
                    "storing default admin password in plaintext"
                );
            }
            warn!(
                username = %settings.default_username,
                "no default_password_hash configured; seeding the built-in default password, change it immediately"
            );
            hasher.hash(FALLBACK_PASSWORD)?
        }
    };
    Ok(NewAdmin::new(settings.default_username.clone(), password))
}

/// Create the default administrator if the store holds none.
///
/// Storage failures propagate untouched; a username conflict on insert means a
/// concurrent instance seeded first and is reported as `AlreadySeeded`.
pub async fn ensure_default_admin<S, H>(
    store: &S,
    settings: &SeedSettings,
    hasher: &H,
) -> Result<SeedOutcome, BootstrapError>
where
    S: AdminStore,
    H: CredentialHasher + ?Sized,
{
    let existing = store.count().await?;

    let outcome = if existing == 0 {
        let admin = default_admin(settings, hasher)?;
        let username = admin.username.clone();
        match store.insert_if_absent(admin).await {
            Ok(InsertOutcome::Inserted(id)) => SeedOutcome::Created { id, username },
            Ok(InsertOutcome::AlreadyPresent) | Err(BootstrapError::Conflict(_)) => {
                SeedOutcome::AlreadySeeded { username }
            }
            Err(e) => return Err(e),
        }
    } else {
        SeedOutcome::Skipped { existing }
    };

    match &outcome {
        SeedOutcome::Created { id, username } => {
            info!(id, username = %username, "{}", outcome.message());
        }
        SeedOutcome::Skipped { existing } => {
            info!(existing, "{}", outcome.message());
        }
        SeedOutcome::AlreadySeeded { username } => {
            info!(
                username = %username,
                "{} (seeded concurrently by another instance)",
                outcome.message()
            );
        }
    }

    Ok(outcome)
}

/// Startup task wrapping `ensure_default_admin`.
pub struct SeedAdminTask<S> {
    store: S,
    settings: SeedSettings,
    hasher: Arc<dyn CredentialHasher>,
}

impl<S: AdminStore> SeedAdminTask<S> {
    pub fn new(store: S, settings: SeedSettings, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            store,
            settings,
            hasher,
        }
    }
}

impl<S: AdminStore> StartupTask for SeedAdminTask<S> {
    fn name(&self) -> &'static str {
        "seed-default-admin"
    }

    fn run(&self) -> BoxFuture<'_, Result<(), BootstrapError>> {
        Box::pin(async move {
            ensure_default_admin(&self.store, &self.settings, self.hasher.as_ref()).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::hasher::{Argon2Hasher, PlaintextHasher};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory store; `unique` mirrors the SQLite UNIQUE(username) constraint.
    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<Vec<NewAdmin>>,
        inserts: AtomicUsize,
        /// Simulates a concurrent writer: the first conditional insert finds the row taken.
        lose_race: bool,
    }

    impl MemoryStore {
        fn with(names: &[&str]) -> Self {
            let store = Self::default();
            store
                .rows
                .lock()
                .unwrap()
                .extend(names.iter().map(|n| NewAdmin::new(*n, "pw")));
            store
        }

        fn rows(&self) -> Vec<NewAdmin> {
            self.rows.lock().unwrap().clone()
        }
    }

    impl AdminStore for MemoryStore {
        async fn count(&self) -> Result<i64, BootstrapError> {
            Ok(self.rows.lock().unwrap().len() as i64)
        }

        async fn insert(&self, admin: NewAdmin) -> Result<i64, BootstrapError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().unwrap();
            rows.push(admin);
            Ok(rows.len() as i64)
        }

        async fn insert_if_absent(&self, admin: NewAdmin) -> Result<InsertOutcome, BootstrapError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            if self.lose_race {
                return Ok(InsertOutcome::AlreadyPresent);
            }
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|r| r.username == admin.username) {
                return Ok(InsertOutcome::AlreadyPresent);
            }
            rows.push(admin);
            Ok(InsertOutcome::Inserted(rows.len() as i64))
        }
    }

    enum Failing {
        Count,
        Insert,
    }

    impl AdminStore for Failing {
        async fn count(&self) -> Result<i64, BootstrapError> {
            match self {
                Failing::Count => Err(sqlx::Error::PoolTimedOut.into()),
                Failing::Insert => Ok(0),
            }
        }

        async fn insert(&self, _admin: NewAdmin) -> Result<i64, BootstrapError> {
            Err(sqlx::Error::PoolClosed.into())
        }

        async fn insert_if_absent(&self, _admin: NewAdmin) -> Result<InsertOutcome, BootstrapError> {
            match self {
                Failing::Count => panic!("insert attempted after failed count"),
                Failing::Insert => Err(sqlx::Error::PoolClosed.into()),
            }
        }
    }

    fn plaintext_settings() -> SeedSettings {
        SeedSettings {
            allow_plaintext_password: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn empty_store_gets_plaintext_admin_when_opted_in() {
        let store = MemoryStore::default();
        let outcome = ensure_default_admin(&store, &plaintext_settings(), &PlaintextHasher)
            .await
            .unwrap();

        assert!(outcome.created());
        assert_eq!(outcome.message(), "Default Admin Created Successfully!");
        assert_eq!(store.rows(), vec![NewAdmin::new("admin", "admin")]);
    }

    #[tokio::test]
    async fn empty_store_gets_hashed_admin_by_default() {
        let store = MemoryStore::default();
        let hasher = Argon2Hasher::new();
        ensure_default_admin(&store, &SeedSettings::default(), &hasher)
            .await
            .unwrap();

        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].username, "admin");
        assert_ne!(rows[0].password, "admin");
        assert!(hasher.verify("admin", &rows[0].password));
    }

    #[tokio::test]
    async fn configured_hash_is_stored_verbatim() {
        let hash = Argon2Hasher::new().hash("s3cret").unwrap();
        let settings = SeedSettings {
            default_username: "root".to_string(),
            default_password_hash: Some(hash.clone()),
            allow_plaintext_password: false,
        };
        let store = MemoryStore::default();
        ensure_default_admin(&store, &settings, &Argon2Hasher::new())
            .await
            .unwrap();

        assert_eq!(store.rows(), vec![NewAdmin::new("root", hash)]);
    }

    #[tokio::test]
    async fn non_empty_store_is_left_alone() {
        let store = MemoryStore::with(&["alice", "bob", "carol"]);
        let outcome = ensure_default_admin(&store, &plaintext_settings(), &PlaintextHasher)
            .await
            .unwrap();

        assert_eq!(outcome, SeedOutcome::Skipped { existing: 3 });
        assert_eq!(outcome.message(), "Admin already exists. Skipping creation.");
        assert_eq!(store.rows().len(), 3);
        assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let store = MemoryStore::default();
        let first = ensure_default_admin(&store, &plaintext_settings(), &PlaintextHasher)
            .await
            .unwrap();
        let second = ensure_default_admin(&store, &plaintext_settings(), &PlaintextHasher)
            .await
            .unwrap();

        assert!(first.created());
        assert_eq!(second, SeedOutcome::Skipped { existing: 1 });
        assert_eq!(store.rows().len(), 1);
        assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn lost_race_is_benign() {
        let store = MemoryStore {
            lose_race: true,
            ..Default::default()
        };
        let outcome = ensure_default_admin(&store, &plaintext_settings(), &PlaintextHasher)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SeedOutcome::AlreadySeeded {
                username: "admin".to_string()
            }
        );
        assert_eq!(outcome.message(), SKIPPED_MESSAGE);
    }

    #[tokio::test]
    async fn count_failure_surfaces_without_insert() {
        let err = ensure_default_admin(&Failing::Count, &plaintext_settings(), &PlaintextHasher)
            .await
            .unwrap_err();
        assert!(err.is_storage_failure());
    }

    #[tokio::test]
    async fn insert_failure_surfaces() {
        let err = ensure_default_admin(&Failing::Insert, &plaintext_settings(), &PlaintextHasher)
            .await
            .unwrap_err();
        assert!(err.is_storage_failure());
    }

    #[tokio::test]
    async fn task_runs_seeder() {
        let store = MemoryStore::default();
        let task = SeedAdminTask::new(store, plaintext_settings(), Arc::new(PlaintextHasher));
        assert_eq!(task.name(), "seed-default-admin");

        task.run().await.unwrap();
        assert_eq!(task.store.rows().len(), 1);
    }
}
