//! Resume ingestion pipeline.
//!
//! Stage-gated: format validation → text extraction → skill extraction →
//! language tagging → role matching → commit. Failure at any stage aborts
//! the rest and reports a specific error kind. The document artifact is
//! written to a fresh per-attempt S3 key only after every validation gate
//! has passed, so a failed attempt never touches the live artifact; any
//! failure after the PUT deletes that key before the error response.

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::matcher::RoleMatch;
use crate::models::user::user_exists;
use crate::state::AppState;

/// First 200 characters of the extracted text are echoed back to the
/// caller; the full text never leaves the profile store.
const PREVIEW_CHARS: usize = 200;

/// An uploaded document as received at the boundary.
pub struct UploadedDocument {
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Derived profile data returned on a successful ingestion.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutcome {
    pub filename: String,
    pub size: usize,
    pub extracted_skills: Vec<String>,
    pub programming_languages: Vec<String>,
    pub matched_roles: Vec<RoleMatch>,
    pub text_preview: String,
}

/// Runs the full ingestion pipeline for one uploaded document.
pub async fn ingest(
    state: &AppState,
    user_id: Uuid,
    document: UploadedDocument,
) -> Result<IngestOutcome, AppError> {
    // Stage 1: format gate, before any processing.
    ensure_pdf(document.content_type.as_deref())?;

    if !user_exists(&state.db, user_id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    // Stage 2: text extraction. Empty or whitespace-only text means the
    // document is image-only or corrupt.
    let raw_text = state.text_extract.extract(&document.bytes).await?;
    let text = raw_text.trim();
    if text.is_empty() {
        return Err(AppError::UnextractableText);
    }

    // Stage 3: skill extraction. A resume with zero recognizable skills is
    // not accepted, regardless of extraction success.
    let extracted_skills = state.skills.extract_skills(text).await?;
    if extracted_skills.is_empty() {
        return Err(AppError::NoSkillsDetected);
    }

    // Stages 4–5: derived data.
    let programming_languages = state.skills.programming_languages(&extracted_skills).await?;
    let matched_roles = state.roles.match_roles(&extracted_skills).await?;

    // Stage 6: commit. PUT to a fresh key, then a single-statement profile
    // upsert, then drop the superseded artifact.
    let previous_key: Option<String> =
        sqlx::query_scalar("SELECT resume_key FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&state.db)
            .await?;

    let resume_key = format!("resumes/{}/{}.pdf", user_id, Uuid::new_v4());
    let size = document.bytes.len();

    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&resume_key)
        .body(ByteStream::from(document.bytes.to_vec()))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

    let matched_roles_json = serde_json::to_value(&matched_roles)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("role matches not serializable: {e}")))?;

    if let Err(e) = commit_profile(
        &state.db,
        user_id,
        &resume_key,
        text,
        &extracted_skills,
        &programming_languages,
        &matched_roles_json,
    )
    .await
    {
        // Compensating delete, awaited before the error response so the
        // client never races a dangling artifact.
        delete_artifact(state, &resume_key).await;
        return Err(e.into());
    }

    info!(
        "Committed profile for user {user_id}: {} skills, {} roles, artifact {resume_key}",
        extracted_skills.len(),
        matched_roles.len()
    );

    // Replacement semantics: exactly one live artifact per user, no history.
    if let Some(old_key) = previous_key.filter(|k| k != &resume_key) {
        delete_artifact(state, &old_key).await;
    }

    Ok(IngestOutcome {
        filename: resume_key,
        size,
        extracted_skills,
        programming_languages,
        matched_roles,
        text_preview: text_preview(text, PREVIEW_CHARS),
    })
}

/// Rejects anything the caller did not declare as a PDF.
fn ensure_pdf(content_type: Option<&str>) -> Result<(), AppError> {
    let declared = content_type
        .and_then(|c| c.split(';').next())
        .map(str::trim)
        .unwrap_or("");
    if declared.eq_ignore_ascii_case("application/pdf") {
        Ok(())
    } else {
        Err(AppError::UnsupportedFormat(
            "Only PDF files are allowed.".to_string(),
        ))
    }
}

/// Whole-profile replacement in one statement: readers never observe skills
/// from one document alongside the role matches of another.
async fn commit_profile(
    pool: &PgPool,
    user_id: Uuid,
    resume_key: &str,
    resume_text: &str,
    extracted_skills: &[String],
    programming_languages: &[String],
    matched_roles: &serde_json::Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO profiles
            (user_id, resume_key, resume_text, extracted_skills,
             programming_languages, matched_roles, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, now(), now())
        ON CONFLICT (user_id) DO UPDATE SET
            resume_key = EXCLUDED.resume_key,
            resume_text = EXCLUDED.resume_text,
            extracted_skills = EXCLUDED.extracted_skills,
            programming_languages = EXCLUDED.programming_languages,
            matched_roles = EXCLUDED.matched_roles,
            updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(resume_key)
    .bind(resume_text)
    .bind(extracted_skills)
    .bind(programming_languages)
    .bind(matched_roles)
    .execute(pool)
    .await?;
    Ok(())
}

async fn delete_artifact(state: &AppState, key: &str) {
    if let Err(e) = state
        .s3
        .delete_object()
        .bucket(&state.config.s3_bucket)
        .key(key)
        .send()
        .await
    {
        warn!("Failed to delete resume artifact {key}: {e}");
    }
}

/// Bounded preview of the extracted text, char-boundary safe.
fn text_preview(text: &str, max_chars: usize) -> String {
    let mut preview: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_content_type_accepted() {
        assert!(ensure_pdf(Some("application/pdf")).is_ok());
        assert!(ensure_pdf(Some("Application/PDF")).is_ok());
        assert!(ensure_pdf(Some("application/pdf; charset=binary")).is_ok());
    }

    #[test]
    fn test_non_pdf_content_types_rejected() {
        for ct in [
            Some("application/msword"),
            Some("image/png"),
            Some("text/plain"),
            None,
        ] {
            assert!(matches!(
                ensure_pdf(ct),
                Err(AppError::UnsupportedFormat(_))
            ));
        }
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let text = "x".repeat(500);
        let preview = text_preview(&text, PREVIEW_CHARS);
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_preview_keeps_short_text_verbatim() {
        assert_eq!(text_preview("short resume", PREVIEW_CHARS), "short resume");
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let text = "é".repeat(300);
        let preview = text_preview(&text, PREVIEW_CHARS);
        assert!(preview.starts_with('é'));
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
    }
}
