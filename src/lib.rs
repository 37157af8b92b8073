//! Students REST resource: CRUD with pagination, sort ordering and course eager-loading.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod query;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{AppConfig, ListDefaults};
pub use error::{AppError, ConfigError};
pub use model::{Course, NewStudent, Student, StudentPatch};
pub use query::{ListSpec, Populate, SortOrder};
pub use routes::{app, common_routes, student_routes, API_PREFIX};
pub use state::AppState;
pub use store::{
    ensure_database_exists, ensure_schema, InMemoryStudentStore, PgStudentStore, StudentStore,
};
