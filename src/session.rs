//! Session - a unit of work over one store
//!
//! Objects added to a session are tracked by handle and stay pending until
//! [`Session::commit`]. Commit writes every pending department, then every
//! pending student, inside a single transaction. Student links made through
//! [`Session::add_student_to`] are resolved to the department's id at that
//! point, so a student may point at a department added in the same batch.
//!
//! Queries read committed rows only; pending objects are not visible to them.

use crate::department::Department;
use crate::storage::SqliteStore;
use crate::student::Student;
use crate::{Error, Result};

/// Session-local reference to a tracked department
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepartmentHandle(usize);

/// Session-local reference to a tracked student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StudentHandle(usize);

/// Lifecycle of an object tracked by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectState {
    /// Added, not yet committed
    Pending,
    /// Written by a successful commit
    Persistent,
    /// Discarded by a rollback before it was committed
    Detached,
}

#[derive(Debug)]
struct Tracked<T> {
    value: T,
    state: ObjectState,
    link: Option<DepartmentHandle>,
}

impl<T> Tracked<T> {
    fn pending(value: T, link: Option<DepartmentHandle>) -> Self {
        Self {
            value,
            state: ObjectState::Pending,
            link,
        }
    }
}

/// Ids assigned by one commit, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub departments: Vec<i64>,
    pub students: Vec<i64>,
}

impl CommitSummary {
    pub fn is_empty(&self) -> bool {
        self.departments.is_empty() && self.students.is_empty()
    }
}

/// A unit of work bound to one database connection
pub struct Session {
    store: SqliteStore,
    departments: Vec<Tracked<Department>>,
    students: Vec<Tracked<Student>>,
}

impl Session {
    pub fn new(store: SqliteStore) -> Self {
        Self {
            store,
            departments: Vec::new(),
            students: Vec::new(),
        }
    }

    // ========== Pending Changes ==========

    /// Track a new department; it is written on the next commit
    pub fn add_department(&mut self, department: Department) -> DepartmentHandle {
        self.departments.push(Tracked::pending(department, None));
        DepartmentHandle(self.departments.len() - 1)
    }

    pub fn add_departments(&mut self, departments: impl IntoIterator<Item = Department>) -> Vec<DepartmentHandle> {
        departments.into_iter().map(|d| self.add_department(d)).collect()
    }

    /// Track a new student using its own `department_id`
    pub fn add_student(&mut self, student: Student) -> StudentHandle {
        self.students.push(Tracked::pending(student, None));
        StudentHandle(self.students.len() - 1)
    }

    /// Track a new student belonging to a tracked department
    ///
    /// The department may still be pending; its id is filled in on commit.
    pub fn add_student_to(&mut self, student: Student, department: DepartmentHandle) -> StudentHandle {
        self.students.push(Tracked::pending(student, Some(department)));
        StudentHandle(self.students.len() - 1)
    }

    pub fn add_students(
        &mut self,
        students: impl IntoIterator<Item = (Student, DepartmentHandle)>,
    ) -> Vec<StudentHandle> {
        students
            .into_iter()
            .map(|(s, d)| self.add_student_to(s, d))
            .collect()
    }

    /// Number of objects waiting for a commit
    pub fn pending(&self) -> usize {
        let depts = self.departments.iter().filter(|t| t.state == ObjectState::Pending).count();
        let students = self.students.iter().filter(|t| t.state == ObjectState::Pending).count();
        depts + students
    }

    /// Discard every pending object
    pub fn rollback(&mut self) {
        let mut discarded = 0;
        for state in self
            .departments
            .iter_mut()
            .map(|t| &mut t.state)
            .chain(self.students.iter_mut().map(|t| &mut t.state))
        {
            if *state == ObjectState::Pending {
                *state = ObjectState::Detached;
                discarded += 1;
            }
        }
        tracing::debug!("rolled back {} pending objects", discarded);
    }

    /// Write all pending objects in one transaction
    ///
    /// On failure nothing is written, no tracked object changes, and the
    /// objects stay pending.
    pub fn commit(&mut self) -> Result<CommitSummary> {
        let dept_idx: Vec<usize> = pending_indices(&self.departments);
        let student_idx: Vec<usize> = pending_indices(&self.students);
        if dept_idx.is_empty() && student_idx.is_empty() {
            return Ok(CommitSummary::default());
        }

        for i in &dept_idx {
            self.departments[*i].value.validate()?;
        }
        for i in &student_idx {
            self.students[*i].value.validate()?;
        }

        self.store.begin_transaction()?;
        let written = self
            .write_pending(&dept_idx, &student_idx)
            .and_then(|written| self.store.commit().map(|_| written));

        let (dept_ids, student_rows) = match written {
            Ok(written) => written,
            Err(e) => {
                if let Err(rb) = self.store.rollback() {
                    tracing::warn!("rollback after failed commit also failed: {}", rb);
                }
                return Err(e);
            }
        };

        for (i, id) in dept_idx.iter().zip(&dept_ids) {
            let tracked = &mut self.departments[*i];
            tracked.value.id = Some(*id);
            tracked.state = ObjectState::Persistent;
        }
        for (i, (id, department_id)) in student_idx.iter().zip(&student_rows) {
            let tracked = &mut self.students[*i];
            tracked.value.id = Some(*id);
            tracked.value.department_id = *department_id;
            tracked.state = ObjectState::Persistent;
        }

        let summary = CommitSummary {
            departments: dept_ids,
            students: student_rows.into_iter().map(|(id, _)| id).collect(),
        };
        tracing::info!(
            "committed {} departments, {} students",
            summary.departments.len(),
            summary.students.len()
        );
        Ok(summary)
    }

    /// Insert the given pending rows; returns assigned ids without touching tracked state
    fn write_pending(
        &self,
        dept_idx: &[usize],
        student_idx: &[usize],
    ) -> Result<(Vec<i64>, Vec<(i64, Option<i64>)>)> {
        let mut dept_ids = Vec::with_capacity(dept_idx.len());
        for i in dept_idx {
            dept_ids.push(self.store.insert_department(&self.departments[*i].value)?);
        }

        let mut student_rows = Vec::with_capacity(student_idx.len());
        for i in student_idx {
            let tracked = &self.students[*i];
            let department_id = match tracked.link {
                Some(handle) => Some(self.resolve_link(handle, dept_idx, &dept_ids)?),
                None => tracked.value.department_id,
            };

            let row = Student {
                department_id,
                ..tracked.value.clone()
            };
            student_rows.push((self.store.insert_student(&row)?, department_id));
        }

        Ok((dept_ids, student_rows))
    }

    /// Department id for a link, looking first at ids assigned in this batch
    fn resolve_link(&self, handle: DepartmentHandle, dept_idx: &[usize], dept_ids: &[i64]) -> Result<i64> {
        if let Some(pos) = dept_idx.iter().position(|i| *i == handle.0) {
            return Ok(dept_ids[pos]);
        }
        let dept = self.department(handle)?;
        dept.id
            .ok_or_else(|| Error::NotPersisted(dept.to_string()))
    }

    // ========== Tracked Objects ==========

    pub fn department(&self, handle: DepartmentHandle) -> Result<&Department> {
        self.departments
            .get(handle.0)
            .map(|t| &t.value)
            .ok_or(Error::InvalidHandle(handle.0))
    }

    pub fn student(&self, handle: StudentHandle) -> Result<&Student> {
        self.students
            .get(handle.0)
            .map(|t| &t.value)
            .ok_or(Error::InvalidHandle(handle.0))
    }

    pub fn department_state(&self, handle: DepartmentHandle) -> Result<ObjectState> {
        self.departments
            .get(handle.0)
            .map(|t| t.state)
            .ok_or(Error::InvalidHandle(handle.0))
    }

    pub fn student_state(&self, handle: StudentHandle) -> Result<ObjectState> {
        self.students
            .get(handle.0)
            .map(|t| t.state)
            .ok_or(Error::InvalidHandle(handle.0))
    }

    // ========== Queries ==========

    pub fn query_departments(&self) -> Result<Vec<Department>> {
        self.store.all_departments()
    }

    pub fn query_students(&self) -> Result<Vec<Student>> {
        self.store.all_students()
    }

    /// Department -> Students for a committed department
    pub fn students_of(&self, handle: DepartmentHandle) -> Result<Vec<Student>> {
        let dept = self.department(handle)?;
        let id = dept.id.ok_or_else(|| Error::NotPersisted(dept.to_string()))?;
        self.store.students_in_department(id)
    }

    /// Student -> Department for a committed student
    pub fn department_of(&self, handle: StudentHandle) -> Result<Option<Department>> {
        let student = self.student(handle)?;
        if !student.is_persisted() {
            return Err(Error::NotPersisted(student.to_string()));
        }
        self.store.department_of(student)
    }

    /// End the session; uncommitted objects are dropped
    pub fn close(self) {
        let pending = self.pending();
        if pending > 0 {
            tracing::warn!("closing session with {} uncommitted objects", pending);
        }
        tracing::debug!("session closed");
    }
}

fn pending_indices<T>(tracked: &[Tracked<T>]) -> Vec<usize> {
    tracked
        .iter()
        .enumerate()
        .filter(|(_, t)| t.state == ObjectState::Pending)
        .map(|(i, _)| i)
        .collect()
}
