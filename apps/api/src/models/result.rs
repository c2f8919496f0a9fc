use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Durable record of one completed quiz attempt.
///
/// (user_id, role) is non-unique: a retest overwrites an existing row in
/// place, a fresh attempt appends a new one. "Latest per role" reduction
/// is left to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResultRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
    pub difficulty: String,
    pub score: i32,
    pub total_questions: i32,
    /// Per-question log: `[{questionIndex, userAnswer, isCorrect}]`.
    pub answers: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
