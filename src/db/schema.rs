//! SQL DDL for initializing the administrator storage.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT
/// - `username` UNIQUE, so concurrent first-time seeding cannot create duplicates
/// - `password` holds a PHC hash string (plaintext only when explicitly enabled)
/// - `created_at` RFC3339 text
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS admins (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;
