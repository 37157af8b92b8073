//! In-memory store backed by ordered maps, for tests and running without a database.

use crate::error::AppError;
use crate::model::{Course, NewStudent, Student, StudentPatch};
use crate::query::{ListSpec, Populate, SortOrder};
use crate::store::StudentStore;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    students: BTreeMap<i64, Student>,
    courses: BTreeMap<i64, Course>,
    last_student_id: i64,
    last_course_id: i64,
}

impl Tables {
    fn courses_of(&self, student_id: i64) -> Vec<Course> {
        self.courses
            .values()
            .filter(|c| c.student_id == student_id)
            .cloned()
            .collect()
    }

    fn load(&self, student: &Student, populate: Populate) -> Student {
        let mut out = student.clone();
        if populate.courses() {
            out.courses = Some(self.courses_of(student.id));
        }
        out
    }
}

/// Clone-friendly via Arc; clones share the same tables.
#[derive(Clone, Default)]
pub struct InMemoryStudentStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|_| AppError::Store("lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|_| AppError::Store("lock poisoned".into()))
    }

    /// Attach a course to an existing student.
    pub fn add_course(
        &self,
        student_id: i64,
        title: &str,
        code: Option<&str>,
    ) -> Result<Course, AppError> {
        let mut tables = self.write()?;
        if !tables.students.contains_key(&student_id) {
            return Err(AppError::Store(format!(
                "foreign key violation: student {} does not exist",
                student_id
            )));
        }
        tables.last_course_id += 1;
        let course = Course {
            id: tables.last_course_id,
            student_id,
            title: title.to_string(),
            code: code.map(str::to_string),
        };
        tables.courses.insert(course.id, course.clone());
        Ok(course)
    }
}

#[async_trait]
impl StudentStore for InMemoryStudentStore {
    async fn create(&self, body: NewStudent) -> Result<Student, AppError> {
        let mut tables = self.write()?;
        tables.last_student_id += 1;
        let now = Utc::now();
        let student = Student {
            id: tables.last_student_id,
            name: body.name,
            email: body.email,
            age: body.age,
            created_at: now,
            updated_at: now,
            courses: None,
        };
        tables.students.insert(student.id, student.clone());
        Ok(student)
    }

    async fn find_all(&self, spec: &ListSpec) -> Result<Vec<Student>, AppError> {
        let tables = self.read()?;
        let offset = usize::try_from(spec.offset).unwrap_or(usize::MAX);
        let limit = spec.limit as usize;
        let ordered: Box<dyn Iterator<Item = &Student>> = match spec.sort {
            SortOrder::Asc => Box::new(tables.students.values()),
            SortOrder::Desc => Box::new(tables.students.values().rev()),
        };
        Ok(ordered
            .skip(offset)
            .take(limit)
            .map(|s| tables.load(s, spec.populate))
            .collect())
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.read()?.students.len() as u64)
    }

    async fn find_by_pk(&self, id: i64, populate: Populate) -> Result<Option<Student>, AppError> {
        let tables = self.read()?;
        Ok(tables.students.get(&id).map(|s| tables.load(s, populate)))
    }

    async fn update(&self, id: i64, patch: StudentPatch) -> Result<Option<Student>, AppError> {
        let mut tables = self.write()?;
        let Some(student) = tables.students.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(student);
        student.updated_at = Utc::now();
        Ok(Some(student.clone()))
    }

    async fn destroy(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.write()?;
        if tables.students.remove(&id).is_none() {
            return Ok(false);
        }
        tables.courses.retain(|_, c| c.student_id != id);
        Ok(true)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }
}
