//! Seed/query driver
//!
//! Straight-line walkthrough: seed two departments and three students,
//! then print every department, every student, and the members of
//! Computer Science.

use std::io::Write;

use crate::department::Department;
use crate::session::Session;
use crate::student::Student;
use crate::Result;

pub const COMPUTER_SCIENCE: &str = "Computer Science";
pub const MATHEMATICS: &str = "Mathematics";

/// Rows printed by each section of the demo
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct DemoReport {
    pub departments: Vec<Department>,
    pub students: Vec<Student>,
    pub computer_science: Vec<Student>,
}

/// Run the demo against `session`, writing human-readable lines to `out`
pub fn run_demo<W: Write>(session: &mut Session, out: &mut W) -> Result<DemoReport> {
    // --- Insert sample data ---
    let depts = session.add_departments([
        Department::new(COMPUTER_SCIENCE),
        Department::new(MATHEMATICS),
    ]);
    let (cs, math) = (depts[0], depts[1]);
    session.commit()?;

    session.add_students([
        (Student::new("Alice"), cs),
        (Student::new("Bob"), math),
        (Student::new("Charlie"), cs),
    ]);
    session.commit()?;

    // --- Query data ---
    let report = DemoReport {
        departments: session.query_departments()?,
        students: session.query_students()?,
        computer_science: session.students_of(cs)?,
    };

    print_section(out, "All Departments:", &report.departments)?;
    print_section(out, "All Students:", &report.students)?;
    print_section(
        out,
        &format!("Students in {}:", COMPUTER_SCIENCE),
        &report.computer_science,
    )?;

    Ok(report)
}

fn print_section<W: Write, T: std::fmt::Display>(out: &mut W, heading: &str, rows: &[T]) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", heading)?;
    for row in rows {
        writeln!(out, "{}", row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStore;

    fn names(students: &[Student]) -> Vec<&str> {
        students.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_demo_rows() {
        let mut session = Session::new(SqliteStore::open_in_memory().unwrap());
        let mut out = Vec::new();
        let report = run_demo(&mut session, &mut out).unwrap();

        let dept_names: Vec<&str> = report.departments.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(dept_names, vec![COMPUTER_SCIENCE, MATHEMATICS]);

        let cs_id = report.departments[0].id;
        let math_id = report.departments[1].id;
        assert_eq!(names(&report.students), vec!["Alice", "Bob", "Charlie"]);
        assert_eq!(report.students[0].department_id, cs_id);
        assert_eq!(report.students[1].department_id, math_id);
        assert_eq!(report.students[2].department_id, cs_id);

        assert_eq!(names(&report.computer_science), vec!["Alice", "Charlie"]);
    }

    #[test]
    fn test_demo_output() {
        let mut session = Session::new(SqliteStore::open_in_memory().unwrap());
        let mut out = Vec::new();
        run_demo(&mut session, &mut out).unwrap();

        let expected = "\nAll Departments:\n\
<Department id=1 name='Computer Science'>\n\
<Department id=2 name='Mathematics'>\n\
\nAll Students:\n\
<Student id=1 name='Alice' department_id=1>\n\
<Student id=2 name='Bob' department_id=2>\n\
<Student id=3 name='Charlie' department_id=1>\n\
\nStudents in Computer Science:\n\
<Student id=1 name='Alice' department_id=1>\n\
<Student id=3 name='Charlie' department_id=1>\n";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }
}
