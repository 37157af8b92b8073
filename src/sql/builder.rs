//! Builds parameterized INSERT, SELECT, UPDATE, DELETE for students. Identifiers are
//! fixed here; every value goes through a placeholder.

use crate::model::{NewStudent, StudentPatch};
use crate::query::{ListSpec, Populate};
use crate::sql::PgBindValue;

pub const STUDENTS_TABLE: &str = "students";
pub const COURSES_TABLE: &str = "courses";

const STUDENT_COLUMNS: &[&str] = &["id", "name", "email", "age", "created_at", "updated_at"];
const COURSE_COLUMNS: &[&str] = &["id", "student_id", "title", "code"];
const MAIN_ALIAS: &str = "main";

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: impl Into<PgBindValue>) -> usize {
        self.params.push(v.into());
        self.params.len()
    }
}

fn column_list(cols: &[&str], alias: Option<&str>) -> String {
    cols.iter()
        .map(|c| match alias {
            Some(a) => format!("{}.{}", a, quoted(c)),
            None => quoted(c),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Student columns plus, when populating, a `courses` json array built by a scalar subquery.
fn student_select(populate: Populate) -> String {
    let mut parts = vec![column_list(STUDENT_COLUMNS, Some(MAIN_ALIAS))];
    if populate.courses() {
        parts.push(format!(
            "(SELECT COALESCE(json_agg(row_to_json(sub) ORDER BY sub.{id}), '[]'::json) FROM (SELECT {cols} FROM {table} WHERE {fk} = {main}.{id}) sub) AS {alias}",
            id = quoted("id"),
            cols = column_list(COURSE_COLUMNS, None),
            table = quoted(COURSES_TABLE),
            fk = quoted("student_id"),
            main = MAIN_ALIAS,
            alias = quoted("courses"),
        ));
    }
    parts.join(", ")
}

/// SELECT page of students ordered by id, with optional courses include.
pub fn select_list(spec: &ListSpec) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} {} ORDER BY {}.{} {} LIMIT {} OFFSET {}",
        student_select(spec.populate),
        quoted(STUDENTS_TABLE),
        MAIN_ALIAS,
        MAIN_ALIAS,
        quoted("id"),
        spec.sort.as_sql(),
        spec.limit,
        spec.offset
    );
    q
}

pub fn count() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT COUNT(*) FROM {}", quoted(STUDENTS_TABLE));
    q
}

/// SELECT by primary key.
pub fn select_by_id(id: i64, populate: Populate) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!(
        "SELECT {} FROM {} {} WHERE {}.{} = ${}::int8",
        student_select(populate),
        quoted(STUDENTS_TABLE),
        MAIN_ALIAS,
        MAIN_ALIAS,
        quoted("id"),
        n
    );
    q
}

/// INSERT; id and timestamps come from column defaults.
pub fn insert(body: &NewStudent) -> QueryBuf {
    let mut q = QueryBuf::new();
    let name = q.push_param(body.name.clone());
    let email = q.push_param(body.email.clone());
    let age = q.push_param(body.age);
    q.sql = format!(
        "INSERT INTO {} ({}, {}, {}) VALUES (${}::text, ${}::text, ${}::int4) RETURNING {}",
        quoted(STUDENTS_TABLE),
        quoted("name"),
        quoted("email"),
        quoted("age"),
        name,
        email,
        age,
        column_list(STUDENT_COLUMNS, None)
    );
    q
}

/// UPDATE by id: SET only fields present in the patch, always bumping `updated_at`.
pub fn update(id: i64, patch: &StudentPatch) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    if let Some(name) = &patch.name {
        let n = q.push_param(name.clone());
        sets.push(format!("{} = ${}::text", quoted("name"), n));
    }
    if let Some(email) = &patch.email {
        let n = q.push_param(email.clone());
        sets.push(format!("{} = ${}::text", quoted("email"), n));
    }
    if let Some(age) = patch.age {
        let n = q.push_param(age);
        sets.push(format!("{} = ${}::int4", quoted("age"), n));
    }
    sets.push(format!("{} = NOW()", quoted("updated_at")));
    let id_param = q.push_param(id);
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}::int8 RETURNING {}",
        quoted(STUDENTS_TABLE),
        sets.join(", "),
        quoted("id"),
        id_param,
        column_list(STUDENT_COLUMNS, None)
    );
    q
}

/// DELETE by id.
pub fn delete(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${}::int8",
        quoted(STUDENTS_TABLE),
        quoted("id"),
        n
    );
    q
}
