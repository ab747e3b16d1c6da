//! End-to-end runs against a file-backed database

use std::path::Path;

use university::{run_demo, Department, Error, Session, SqliteStore, Student, StoreOptions};

fn run_once(path: &Path) -> university::DemoReport {
    let mut session = Session::new(SqliteStore::open(path).unwrap());
    let report = run_demo(&mut session, &mut std::io::sink()).unwrap();
    session.close();
    report
}

#[test]
fn test_demo_persists_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("university.db");
    run_once(&path);

    // Fresh connection sees the committed rows
    let store = SqliteStore::open(&path).unwrap();
    let departments = store.all_departments().unwrap();
    let names: Vec<&str> = departments.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Computer Science", "Mathematics"]);

    let cs = departments[0].id.unwrap();
    let math = departments[1].id.unwrap();
    let students = store.all_students().unwrap();
    let rows: Vec<(&str, Option<i64>)> = students
        .iter()
        .map(|s| (s.name.as_str(), s.department_id))
        .collect();
    assert_eq!(
        rows,
        vec![("Alice", Some(cs)), ("Bob", Some(math)), ("Charlie", Some(cs))]
    );

    let members: Vec<String> = store
        .students_in_department(cs)
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(members, vec!["Alice", "Charlie"]);
}

#[test]
fn test_reopen_keeps_schema_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("university.db");

    let before = SqliteStore::open(&path).unwrap().schema_definitions().unwrap();
    let store = SqliteStore::open(&path).unwrap();
    store.initialize_schema().unwrap();
    assert_eq!(store.schema_definitions().unwrap(), before);
}

#[test]
fn test_second_run_appends_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("university.db");
    run_once(&path);
    let report = run_once(&path);

    assert_eq!(report.departments.len(), 4);
    assert_eq!(report.students.len(), 6);
    // Traversal follows the second run's department only
    let cs_id = report.departments[2].id;
    assert_eq!(report.computer_science.len(), 2);
    assert!(report.computer_science.iter().all(|s| s.department_id == cs_id));
}

#[test]
fn test_dangling_department_rejected_at_commit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("university.db");

    let mut session = Session::new(SqliteStore::open(&path).unwrap());
    session.add_department(Department::new("Physics"));
    session.add_student(Student::new("Ghost").with_department_id(404));
    assert!(matches!(session.commit(), Err(Error::UnknownDepartment(404))));
    session.close();

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.count_departments().unwrap(), 0);
    assert_eq!(store.count_students().unwrap(), 0);
}

#[test]
fn test_dangling_department_stored_when_not_enforced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("university.db");
    let options = StoreOptions { foreign_keys: false };

    let mut session = Session::new(SqliteStore::open_with(&path, &options).unwrap());
    let ghost = session.add_student(Student::new("Ghost").with_department_id(404));
    session.commit().unwrap();
    assert_eq!(session.department_of(ghost).unwrap(), None);
}
