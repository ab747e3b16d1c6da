//! Department record kind
//!
//! A department owns a collection of students. The collection itself is not
//! stored on the struct; it is loaded on demand through
//! [`crate::Session::students_of`] or [`crate::SqliteStore::students_in_department`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A row of the `departments` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Primary key, `None` until the first successful commit
    pub id: Option<i64>,
    /// Department name (required, non-empty)
    pub name: String,
}

impl Department {
    /// Create a new, not yet persisted department
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Whether this department has been assigned an id by the store
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Check the record invariants before it is written
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("department name must not be empty".to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Department id={} name='{}'>", id, self.name),
            None => write!(f, "<Department id=None name='{}'>", self.name),
        }
    }
}
