use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::ingest::extract::TextExtract;
use crate::ingest::matcher::RoleMatcher;
use crate::ingest::skills::SkillExtractor;
use crate::quiz::provider::QuestionProvider;
use crate::quiz::store::AttemptStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Redis client reserved for durable attempt checkpointing, should the
    /// in-memory attempt store ever need to survive restarts.
    #[allow(dead_code)]
    pub redis: RedisClient,
    pub s3: S3Client,
    pub config: Config,
    /// Pluggable collaborators. Defaults are wired at startup; swapping a
    /// backend never touches pipeline or ledger code.
    pub text_extract: Arc<dyn TextExtract>,
    pub skills: Arc<dyn SkillExtractor>,
    pub roles: Arc<dyn RoleMatcher>,
    pub questions: Arc<dyn QuestionProvider>,
    /// In-flight quiz attempts, in memory only.
    pub attempts: AttemptStore,
}
