//! Axum route handler for cover-letter generation.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::cover_letter::composer::LetterInput;
use crate::errors::AppError;
use crate::models::record::to_public;
use crate::models::resume::{scalar_text, ResumeProfile};
use crate::state::AppState;
use crate::store::{Collection, DocumentStore, RecordKey};

/// Fields accept any scalar: numbers and bools are read as their text.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterRequest {
    pub company: Option<Value>,
    pub position: Option<Value>,
    pub description: Option<Value>,
    pub location: Option<Value>,
    /// Free text ("$120k") or a bare number.
    pub salary: Option<Value>,
    pub resume_id: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterResponse {
    pub success: bool,
    pub cover_letter: String,
    pub generated_by: &'static str,
}

fn text(value: &Option<Value>) -> Option<String> {
    value.as_ref().and_then(scalar_text)
}

/// POST /api/generate-cover-letter
///
/// Missing `company`, `position` or `resumeId` is a 400. A resume that cannot
/// be loaded is not an error: the letter falls back to placeholders.
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    payload: Result<Json<CoverLetterRequest>, JsonRejection>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let Json(request) = payload?;

    let (Some(company), Some(position), Some(resume_id)) = (
        text(&request.company),
        text(&request.position),
        text(&request.resume_id),
    ) else {
        return Err(AppError::Validation(
            "Missing required fields: company, position, or resumeId".to_string(),
        ));
    };

    info!("Generating cover letter for {position} at {company} (resume {resume_id})");

    let resume = load_resume(state.store.as_ref(), &resume_id).await;

    let input = LetterInput {
        company,
        position,
        description: text(&request.description),
        location: text(&request.location),
        salary: text(&request.salary),
        resume,
        date: Local::now().date_naive(),
    };

    let letter = state.cover_letters.generate(&input).await;

    Ok(Json(CoverLetterResponse {
        success: true,
        cover_letter: letter.text,
        generated_by: letter.backend,
    }))
}

/// Best-effort resume lookup. Every failure degrades to `None`.
async fn load_resume(store: &dyn DocumentStore, resume_id: &str) -> Option<ResumeProfile> {
    match store
        .find(Collection::Resumes, &RecordKey::parse(resume_id))
        .await
    {
        Ok(Some(doc)) => match ResumeProfile::from_json(to_public(doc)) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("Resume {resume_id} could not be read as a profile: {e}");
                None
            }
        },
        Ok(None) => {
            info!("Resume {resume_id} not found; using placeholders");
            None
        }
        Err(e) => {
            warn!("Could not fetch resume {resume_id}: {e}");
            None
        }
    }
}
