//! Data-store contract for students plus its PostgreSQL and in-memory backends.

mod memory;
mod postgres;

pub use memory::InMemoryStudentStore;
pub use postgres::{ensure_database_exists, ensure_schema, PgStudentStore};

use crate::error::AppError;
use crate::model::{NewStudent, Student, StudentPatch};
use crate::query::{ListSpec, Populate};
use async_trait::async_trait;

#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Insert and return the persisted row with its assigned id.
    async fn create(&self, body: NewStudent) -> Result<Student, AppError>;

    /// One page ordered by id, with courses attached when `spec.populate` asks.
    async fn find_all(&self, spec: &ListSpec) -> Result<Vec<Student>, AppError>;

    /// Total rows in the table, independent of paging.
    async fn count(&self) -> Result<u64, AppError>;

    async fn find_by_pk(&self, id: i64, populate: Populate) -> Result<Option<Student>, AppError>;

    /// Apply the patch; `None` when no row has this id.
    async fn update(&self, id: i64, patch: StudentPatch) -> Result<Option<Student>, AppError>;

    /// Remove the row; `false` when no row has this id.
    async fn destroy(&self, id: i64) -> Result<bool, AppError>;

    /// Readiness check.
    async fn ping(&self) -> Result<(), AppError>;
}
