//! Student CRUD handlers: create, list, read, update, delete.

use crate::error::AppError;
use crate::extractors::{JsonBody, QueryParams};
use crate::model::{NewStudent, StudentPatch};
use crate::query::{ListSpec, Populate};
use crate::response::{message, paginated};
use crate::service::RequestValidator;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("invalid id".into()))
}

/// Object with unknown keys, missing `name` or wrong field types: 422.
fn parse_body<T: DeserializeOwned>(value: Value) -> Result<T, AppError> {
    serde_json::from_value(value).map_err(|e| AppError::Validation(e.to_string()))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let body: NewStudent = parse_body(body)?;
    RequestValidator::validate_new(&body)?;
    let student = state.store.create(body).await?;
    tracing::info!(id = student.id, "student created");
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams,
) -> Result<impl IntoResponse, AppError> {
    let spec = ListSpec::from_params(&params, &state.list_defaults)?;
    let rows = state.store.find_all(&spec).await?;
    let total = state.store.count().await?;
    Ok((
        StatusCode::OK,
        Json(paginated(rows, total, spec.limit, spec.page)),
    ))
}

/// Always eager-loads courses.
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let student = state
        .store
        .find_by_pk(id, Populate::Courses)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok((StatusCode::OK, Json(student)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let patch: StudentPatch = parse_body(body)?;
    RequestValidator::validate_patch(&patch)?;
    let student = state
        .store
        .update(id, patch)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(id, "student updated");
    Ok((StatusCode::OK, Json(student)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    if !state.store.destroy(id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(id, "student deleted");
    Ok((StatusCode::OK, Json(message("Deleted"))))
}
