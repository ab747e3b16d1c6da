//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use crate::{Error, Result};
use crate::department::Department;
use crate::student::Student;
use super::schema;

/// Connection-level settings applied when a store is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Enforce `students.department_id -> departments.id`
    pub foreign_keys: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { foreign_keys: true }
    }
}

/// SQLite-backed storage for departments and students
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with(path, &StoreOptions::default())
    }

    /// Open a database file with explicit options
    pub fn open_with(path: &Path, options: &StoreOptions) -> Result<Self> {
        tracing::debug!("opening database {}", path.display());
        let conn = Connection::open(path)?;
        Self::from_connection(conn, options)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::open_in_memory_with(&StoreOptions::default())
    }

    pub fn open_in_memory_with(options: &StoreOptions) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, options)
    }

    fn from_connection(conn: Connection, options: &StoreOptions) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", options.foreign_keys)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    ///
    /// Every statement is `IF NOT EXISTS`, so this is safe on an existing file.
    pub fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        tracing::debug!("schema ready");
        Ok(())
    }

    /// Whether `PRAGMA foreign_keys` is active on this connection
    pub fn foreign_keys_enabled(&self) -> Result<bool> {
        let on: i64 = self.conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;
        Ok(on != 0)
    }

    /// The stored `CREATE` statements for tables and indexes, ordered by name
    pub fn schema_definitions(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT sql FROM sqlite_master WHERE type IN ('table', 'index') AND sql IS NOT NULL ORDER BY name"
        )?;
        let defs = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(defs)
    }

    // ========== Department Operations ==========

    /// Insert a department and return its assigned id
    pub fn insert_department(&self, department: &Department) -> Result<i64> {
        department.validate()?;
        self.conn.execute(
            "INSERT INTO departments (name) VALUES (?1)",
            params![department.name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a department by id
    pub fn get_department(&self, id: i64) -> Result<Option<Department>> {
        self.conn
            .query_row(
                "SELECT id, name FROM departments WHERE id = ?1",
                [id],
                row_to_department,
            )
            .optional()
            .map_err(Into::into)
    }

    /// All departments, in id order
    pub fn all_departments(&self) -> Result<Vec<Department>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM departments ORDER BY id")?;
        let departments = stmt
            .query_map([], row_to_department)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(departments)
    }

    /// Count all departments
    pub fn count_departments(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM departments", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Student Operations ==========

    /// Insert a student and return its assigned id
    ///
    /// With foreign keys enforced, a `department_id` that names no existing
    /// department fails with [`Error::UnknownDepartment`].
    pub fn insert_student(&self, student: &Student) -> Result<i64> {
        student.validate()?;
        let inserted = self.conn.execute(
            "INSERT INTO students (name, department_id) VALUES (?1, ?2)",
            params![student.name, student.department_id],
        );

        match inserted {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(e) if is_foreign_key_violation(&e) => {
                Err(Error::UnknownDepartment(student.department_id.unwrap_or_default()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a student by id
    pub fn get_student(&self, id: i64) -> Result<Option<Student>> {
        self.conn
            .query_row(
                "SELECT id, name, department_id FROM students WHERE id = ?1",
                [id],
                row_to_student,
            )
            .optional()
            .map_err(Into::into)
    }

    /// All students, in id order
    pub fn all_students(&self) -> Result<Vec<Student>> {
        let mut stmt = self.conn.prepare("SELECT id, name, department_id FROM students ORDER BY id")?;
        let students = stmt
            .query_map([], row_to_student)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(students)
    }

    /// Count all students
    pub fn count_students(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Relationship Operations ==========

    /// Students belonging to a department (Department -> Students), in id order
    pub fn students_in_department(&self, department_id: i64) -> Result<Vec<Student>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, department_id FROM students WHERE department_id = ?1 ORDER BY id"
        )?;
        let students = stmt
            .query_map([department_id], row_to_student)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(students)
    }

    /// The department a student belongs to (Student -> Department)
    ///
    /// Returns `None` when the student has no department, or when the
    /// reference dangles because foreign keys were not enforced.
    pub fn department_of(&self, student: &Student) -> Result<Option<Department>> {
        match student.department_id {
            Some(id) => self.get_department(id),
            None => Ok(None),
        }
    }

    // ========== Transaction Operations ==========

    /// Begin a transaction
    pub fn begin_transaction(&mut self) -> Result<()> {
        self.conn.execute_batch("BEGIN TRANSACTION")?;
        Ok(())
    }

    /// Commit the current transaction
    pub fn commit(&mut self) -> Result<()> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    /// Roll back the current transaction
    pub fn rollback(&mut self) -> Result<()> {
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }

    /// Remove every row, children first
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute_batch("DELETE FROM students; DELETE FROM departments;")?;
        Ok(())
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            departments: self.count_departments()?,
            students: self.count_students()?,
            foreign_keys: self.foreign_keys_enabled()?,
        })
    }
}

fn row_to_department(row: &rusqlite::Row) -> rusqlite::Result<Department> {
    Ok(Department {
        id: Some(row.get(0)?),
        name: row.get(1)?,
    })
}

fn row_to_student(row: &rusqlite::Row) -> rusqlite::Result<Student> {
    Ok(Student {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        department_id: row.get(2)?,
    })
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
        }
        _ => false,
    }
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DbStats {
    pub departments: usize,
    pub students: usize,
    pub foreign_keys: bool,
}
