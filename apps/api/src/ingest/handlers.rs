//! Axum route handlers for resume ingestion and profile reads.

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::pipeline::{ingest, IngestOutcome, UploadedDocument};
use crate::models::profile::ProfileRow;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub data: IngestOutcome,
}

/// POST /api/v1/resume
///
/// Multipart upload. The `file` field carries the document; its declared
/// content type is the format gate's input.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut document: Option<UploadedDocument> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() == Some("file") {
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            document = Some(UploadedDocument {
                content_type,
                bytes,
            });
            break;
        }
    }

    let document = document.ok_or_else(|| {
        AppError::Validation("No file uploaded. Please upload a PDF file.".to_string())
    })?;

    let outcome = ingest(&state, params.user_id, document).await?;

    Ok(Json(UploadResponse {
        message: "Resume processed successfully.".to_string(),
        data: outcome,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub extracted_skills: Vec<String>,
    pub programming_languages: Vec<String>,
    pub matched_roles: serde_json::Value,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// GET /api/v1/resume
///
/// Returns the current derived profile. 404 until the first successful
/// upload.
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = fetch_profile(&state, params.user_id).await?;
    Ok(Json(ProfileResponse {
        extracted_skills: profile.extracted_skills,
        programming_languages: profile.programming_languages,
        matched_roles: profile.matched_roles,
        updated_at: profile.updated_at,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeTextResponse {
    pub resume_text: String,
    pub has_resume: bool,
}

/// GET /api/v1/resume/text
pub async fn handle_get_resume_text(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeTextResponse>, AppError> {
    let profile = fetch_profile(&state, params.user_id).await?;
    Ok(Json(ResumeTextResponse {
        resume_text: profile.resume_text,
        has_resume: true,
    }))
}

async fn fetch_profile(state: &AppState, user_id: Uuid) -> Result<ProfileRow, AppError> {
    sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No resume uploaded yet.".to_string()))
}
