//! Persisted entities and the typed request payloads that mutate them.

mod course;
mod student;

pub use course::Course;
pub use student::{NewStudent, Student, StudentPatch};
