//! # University - an ORM walkthrough over SQLite
//!
//! Two related record kinds mapped onto a single-file relational database.
//!
//! University provides:
//! - `Department` and `Student` record types with name validation
//! - SQLite-backed storage with idempotent schema bootstrap
//! - A unit-of-work `Session` that assigns ids on commit
//! - Relationship traversal in both directions (department <-> students)
//! - A seed/query driver that walks through the whole lifecycle

pub mod department;
pub mod student;
pub mod storage;
pub mod session;
pub mod seed;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use department::Department;
pub use student::Student;
pub use storage::{SqliteStore, StoreOptions};
pub use session::{CommitSummary, DepartmentHandle, Session, StudentHandle};
pub use seed::{run_demo, DemoReport};

/// Result type alias for University operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for University operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Department {0} does not exist")]
    UnknownDepartment(i64),

    #[error("Not persisted: {0}")]
    NotPersisted(String),

    #[error("Invalid session handle: {0}")]
    InvalidHandle(usize),
}
