//! Database module: models, schema and the administrator record store.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `store.rs`: the `AdminStore` seam the seeder depends on
//! - `sqlite.rs`: SQLite-backed `AdminStore`

pub mod models;
pub mod schema;
pub mod sqlite;
pub mod store;

pub use models::{DbAdmin, NewAdmin};
pub use schema::SQLITE_INIT;
pub use sqlite::{AdminStorage, SqlitePool};
pub use store::{AdminStore, InsertOutcome};
