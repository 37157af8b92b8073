use serde::{Deserialize, Serialize};

/// Read-only here; only ever attached to a student by eager-loading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub student_id: i64,
    pub title: String,
    #[serde(default)]
    pub code: Option<String>,
}
