//! Database schema definitions

/// SQL to create the departments table
pub const CREATE_DEPARTMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS departments (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
)
"#;

/// SQL to create the students table
/// `department_id` is nullable: a student belongs to at most one department
pub const CREATE_STUDENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    department_id INTEGER REFERENCES departments(id)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_students_department ON students(department_id)",
];

/// All schema creation statements, parents before children
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_DEPARTMENTS_TABLE, CREATE_STUDENTS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
