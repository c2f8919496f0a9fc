//! Result ledger — durable storage of completed attempts under the
//! retest-or-new versioning rule.

use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::result::ResultRow;
use crate::models::user::user_email;
use crate::quiz::attempt::AnswerLogEntry;
use crate::quiz::provider::Difficulty;

/// Parameters for persisting one completed attempt.
pub struct FinalizeParams<'a> {
    pub user_id: Uuid,
    pub role: &'a str,
    pub difficulty: Difficulty,
    pub score: usize,
    pub total_questions: usize,
    pub answer_log: &'a [AnswerLogEntry],
    /// Result row being retested. A stale or foreign-owned reference
    /// degrades into a fresh row, never an error.
    pub existing_result: Option<Uuid>,
}

/// Persists a completed attempt: update-if-owned, else create.
///
/// With a reference, the update is restricted to `id AND user_id` so a
/// reference owned by a different user can never be overwritten; a miss
/// falls through to an unconditional insert.
pub async fn finalize(pool: &PgPool, params: FinalizeParams<'_>) -> Result<Uuid, AppError> {
    let role = params.role.trim();
    if role.is_empty() {
        return Err(AppError::Validation("role must not be empty".to_string()));
    }

    let email = user_email(pool, params.user_id).await?;
    let answers = serde_json::to_value(params.answer_log)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("answer log not serializable: {e}")))?;

    if let Some(result_id) = params.existing_result {
        let updated: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE results
            SET email = $1, role = $2, difficulty = $3, score = $4,
                total_questions = $5, answers = $6, updated_at = now()
            WHERE id = $7 AND user_id = $8
            RETURNING id
            "#,
        )
        .bind(&email)
        .bind(role)
        .bind(params.difficulty.as_str())
        .bind(params.score as i32)
        .bind(params.total_questions as i32)
        .bind(&answers)
        .bind(result_id)
        .bind(params.user_id)
        .fetch_optional(pool)
        .await?;

        if let Some(id) = updated {
            info!("Updated result {id} in place (retest) for user {}", params.user_id);
            return Ok(id);
        }
        debug!("Result reference {result_id} not owned by caller; creating a new row");
    }

    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO results (user_id, email, role, difficulty, score, total_questions, answers)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(params.user_id)
    .bind(&email)
    .bind(role)
    .bind(params.difficulty.as_str())
    .bind(params.score as i32)
    .bind(params.total_questions as i32)
    .bind(&answers)
    .fetch_one(pool)
    .await?;

    info!(
        "Created result {id} for user {} ({role}, {}/{})",
        params.user_id, params.score, params.total_questions
    );
    Ok(id)
}

/// Full attempt history for a user, newest update first. Any "one row per
/// role" reduction is the caller's concern.
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<ResultRow>, AppError> {
    Ok(sqlx::query_as::<_, ResultRow>(
        "SELECT * FROM results WHERE user_id = $1 ORDER BY updated_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}
