//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - departments(id, name)
//! - students(id, name, department_id -> departments.id)

pub mod schema;
pub mod sqlite;

pub use sqlite::{DbStats, SqliteStore, StoreOptions};
