//! Shared helpers: serve the router on an ephemeral port and a store that always fails.

use async_trait::async_trait;
use std::sync::Arc;
use student_api::{
    app, AppError, AppState, ListDefaults, ListSpec, NewStudent, Populate, Student, StudentPatch,
    StudentStore,
};
use tokio::net::TcpListener;

/// Start the app with `store`; returns the base url of the students API.
pub async fn spawn_app(store: Arc<dyn StudentStore>) -> String {
    let state = AppState::new(store, ListDefaults::default());
    let router = app(state, 64 * 1024);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub struct FailingStore;

fn down() -> AppError {
    AppError::Store("connection refused".into())
}

#[async_trait]
impl StudentStore for FailingStore {
    async fn create(&self, _body: NewStudent) -> Result<Student, AppError> {
        Err(down())
    }

    async fn find_all(&self, _spec: &ListSpec) -> Result<Vec<Student>, AppError> {
        Err(down())
    }

    async fn count(&self) -> Result<u64, AppError> {
        Err(down())
    }

    async fn find_by_pk(&self, _id: i64, _populate: Populate) -> Result<Option<Student>, AppError> {
        Err(down())
    }

    async fn update(&self, _id: i64, _patch: StudentPatch) -> Result<Option<Student>, AppError> {
        Err(down())
    }

    async fn destroy(&self, _id: i64) -> Result<bool, AppError> {
        Err(down())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(down())
    }
}
