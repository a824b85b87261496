use crate::db::models::{DbAdmin, NewAdmin};
use crate::db::schema::SQLITE_INIT;
use crate::db::store::{AdminStore, InsertOutcome};
use crate::error::BootstrapError;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct AdminStorage {
    pool: SqlitePool,
}

impl AdminStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for `database_url`, creating the database file if needed.
    pub async fn connect(database_url: &str) -> Result<Self, BootstrapError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), BootstrapError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, BootstrapError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    /// Plain insert; a taken username surfaces as `BootstrapError::Conflict`.
    pub async fn insert(&self, admin: NewAdmin) -> Result<i64, BootstrapError> {
        let result = sqlx::query(
            "INSERT INTO admins (username, password, created_at) VALUES (?, ?, ?)",
        )
        .bind(&admin.username)
        .bind(admin.password)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(BootstrapError::Conflict(admin.username))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Uses SQLite `INSERT ... ON CONFLICT(username) DO NOTHING`.
    pub async fn insert_if_absent(&self, admin: NewAdmin) -> Result<InsertOutcome, BootstrapError> {
        let done = sqlx::query(
            r#"
            INSERT INTO admins (username, password, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(username) DO NOTHING
            "#,
        )
        .bind(admin.username)
        .bind(admin.password)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        if done.rows_affected() == 0 {
            Ok(InsertOutcome::AlreadyPresent)
        } else {
            Ok(InsertOutcome::Inserted(done.last_insert_rowid()))
        }
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<DbAdmin>, BootstrapError> {
        let row = sqlx::query(
            "SELECT id, username, password, created_at FROM admins WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    pub async fn list(&self) -> Result<Vec<DbAdmin>, BootstrapError> {
        let rows = sqlx::query("SELECT id, username, password, created_at FROM admins ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    fn row_to_model(row: SqliteRow) -> Result<DbAdmin, BootstrapError> {
        let id: i64 = row.try_get("id")?;
        let username: String = row.try_get("username")?;
        let password: String = row.try_get("password")?;
        let created_at_str: String = row.try_get("created_at")?;

        let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(DbAdmin {
            id,
            username,
            password,
            created_at,
        })
    }
}

impl AdminStore for AdminStorage {
    async fn count(&self) -> Result<i64, BootstrapError> {
        AdminStorage::count(self).await
    }

    async fn insert(&self, admin: NewAdmin) -> Result<i64, BootstrapError> {
        AdminStorage::insert(self, admin).await
    }

    async fn insert_if_absent(&self, admin: NewAdmin) -> Result<InsertOutcome, BootstrapError> {
        AdminStorage::insert_if_absent(self, admin).await
    }
}
