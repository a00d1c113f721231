use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::extract::JsonBody;
use crate::records::{self, DeleteResponse, ListQuery, RecordResponse};
use crate::state::AppState;
use crate::store::Collection;

#[derive(Serialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<Value>,
}

/// GET /api/applications?userId=
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApplicationListResponse>, AppError> {
    let applications =
        records::list(state.store.as_ref(), Collection::Applications, &query).await?;
    Ok(Json(ApplicationListResponse { applications }))
}

/// GET /api/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecordResponse>, AppError> {
    let data = records::get(state.store.as_ref(), Collection::Applications, &id).await?;
    Ok(Json(RecordResponse::new(data)))
}

/// POST /api/applications
///
/// Fields are free-form; `resumeUsed` is stored as given and never resolved.
pub async fn handle_create_application(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<RecordResponse>), AppError> {
    let data = records::create(state.store.as_ref(), Collection::Applications, body).await?;
    Ok((StatusCode::CREATED, Json(RecordResponse::new(data))))
}

/// PUT /api/applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Json<RecordResponse>, AppError> {
    let data = records::update(state.store.as_ref(), Collection::Applications, &id, body).await?;
    Ok(Json(RecordResponse::new(data)))
}

/// DELETE /api/applications/:id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let response = records::delete(state.store.as_ref(), Collection::Applications, &id).await?;
    Ok(Json(response))
}
