//! Students resource routes. Updates are accepted on both PUT and PATCH.

use crate::handlers::students::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn student_routes(state: AppState) -> Router {
    Router::new()
        .route("/students", get(list).post(create))
        .route(
            "/students/:id",
            get(read).put(update).patch(update).delete(delete_handler),
        )
        .with_state(state)
}
