//! JSON body and query-string extractors that reject with `AppError::BadRequest`,
//! so malformed input still gets an `error` body.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

/// A JSON object body. Syntax errors, a missing `Content-Type: application/json`
/// and non-object JSON are all rejected.
#[derive(Debug)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        if !value.is_object() {
            return Err(AppError::BadRequest("body must be a JSON object".into()));
        }
        Ok(JsonBody(value))
    }
}

/// Raw query parameters; repeated keys keep the last value.
#[derive(Debug)]
pub struct QueryParams(pub HashMap<String, String>);

#[async_trait]
impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(QueryParams(params))
    }
}
