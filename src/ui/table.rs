use tabled::{settings::Style, Table, Tabled};

use crate::department::Department;
use crate::storage::DbStats;
use crate::student::Student;

#[derive(Tabled)]
struct DepartmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Department")]
    name: String,
}

#[derive(Tabled)]
struct StudentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Student")]
    name: String,
    #[tabled(rename = "Department ID")]
    department_id: String,
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn opt(v: Option<i64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn department_table(departments: &[Department]) -> String {
    render(
        departments
            .iter()
            .map(|d| DepartmentRow {
                id: opt(d.id),
                name: d.name.clone(),
            })
            .collect(),
    )
}

pub fn student_table(students: &[Student]) -> String {
    render(
        students
            .iter()
            .map(|s| StudentRow {
                id: opt(s.id),
                name: s.name.clone(),
                department_id: opt(s.department_id),
            })
            .collect(),
    )
}

pub fn stats_table(stats: &DbStats) -> String {
    let rows = [
        ("Departments", stats.departments.to_string()),
        ("Students", stats.students.to_string()),
        ("Foreign keys", if stats.foreign_keys { "on" } else { "off" }.to_string()),
    ];
    render(
        rows.into_iter()
            .map(|(metric, value)| MetricRow {
                metric: metric.to_string(),
                value,
            })
            .collect(),
    )
}
