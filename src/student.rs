//! Student record kind

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A row of the `students` table.
///
/// A student belongs to at most one department through `department_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Primary key, `None` until the first successful commit
    pub id: Option<i64>,
    /// Student name (required, non-empty)
    pub name: String,
    /// Foreign key into `departments(id)`
    pub department_id: Option<i64>,
}

impl Student {
    /// Create a new student without a department
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            department_id: None,
        }
    }

    /// Set the department by raw id
    pub fn with_department_id(mut self, department_id: i64) -> Self {
        self.department_id = Some(department_id);
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Check the record invariants before it is written
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("student name must not be empty".to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Display for Student {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = self.id.map(|v| v.to_string()).unwrap_or_else(|| "None".to_string());
        let dept = self
            .department_id
            .map(|v| v.to_string())
            .unwrap_or_else(|| "None".to_string());
        write!(f, "<Student id={} name='{}' department_id={}>", id, self.name, dept)
    }
}
