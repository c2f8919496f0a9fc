use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A user's derived skill profile. Exactly one row per user; replaced
/// wholesale on each successful resume upload.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    /// S3 key of the single live resume artifact backing this profile.
    pub resume_key: String,
    pub resume_text: String,
    pub extracted_skills: Vec<String>,
    pub programming_languages: Vec<String>,
    /// Ranked `[{role, score}]`, sorted by score descending.
    pub matched_roles: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
