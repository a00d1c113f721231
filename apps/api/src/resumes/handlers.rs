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
use crate::resumes::validation::prepare_new_resume;
use crate::state::AppState;
use crate::store::Collection;

#[derive(Serialize)]
pub struct ResumeListResponse {
    pub resumes: Vec<Value>,
}

/// GET /api/resumes?userId=
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let resumes = records::list(state.store.as_ref(), Collection::Resumes, &query).await?;
    Ok(Json(ResumeListResponse { resumes }))
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecordResponse>, AppError> {
    let data = records::get(state.store.as_ref(), Collection::Resumes, &id).await?;
    Ok(Json(RecordResponse::new(data)))
}

/// POST /api/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<RecordResponse>), AppError> {
    let body = prepare_new_resume(body)?;
    let data = records::create(state.store.as_ref(), Collection::Resumes, body).await?;
    Ok((StatusCode::CREATED, Json(RecordResponse::new(data))))
}

/// PUT /api/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Json<RecordResponse>, AppError> {
    let data = records::update(state.store.as_ref(), Collection::Resumes, &id, body).await?;
    Ok(Json(RecordResponse::new(data)))
}

/// DELETE /api/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let response = records::delete(state.store.as_ref(), Collection::Resumes, &id).await?;
    Ok(Json(response))
}
