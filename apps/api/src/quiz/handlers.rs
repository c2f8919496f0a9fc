//! Axum route handlers for the quiz attempt lifecycle.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::handlers::UserIdQuery;
use crate::ingest::matcher::role_labels;
use crate::models::result::ResultRow;
use crate::models::user::user_exists;
use crate::quiz::attempt::{ClientQuestion, QuizAttempt};
use crate::quiz::ledger::{self, FinalizeParams};
use crate::quiz::provider::Difficulty;
use crate::quiz::store::Submission;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartAttemptRequest {
    pub user_id: Uuid,
    pub role: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Result being retested; its row is updated in place on completion.
    pub result_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartAttemptResponse {
    pub attempt_id: Uuid,
    pub role: String,
    pub difficulty: Difficulty,
    pub total_questions: usize,
    pub questions: Vec<ClientQuestion>,
}

/// POST /api/v1/quiz/attempts
///
/// Generates questions and opens an attempt. Generation failure abandons
/// the attempt with no stored state and no Result.
pub async fn handle_start_attempt(
    State(state): State<AppState>,
    Json(req): Json<StartAttemptRequest>,
) -> Result<Json<StartAttemptResponse>, AppError> {
    let role = req.role.trim().to_string();
    if role.is_empty() {
        return Err(AppError::Validation("role must not be empty".to_string()));
    }
    if !user_exists(&state.db, req.user_id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let questions = state.questions.generate(&role, req.difficulty).await?;
    info!(
        "Generated {} questions for {role} ({})",
        questions.len(),
        req.difficulty
    );

    let attempt = QuizAttempt::new(req.user_id, role.clone(), req.difficulty, req.result_id, questions)?;
    let response = StartAttemptResponse {
        attempt_id: attempt.id,
        role,
        difficulty: req.difficulty,
        total_questions: attempt.total(),
        questions: attempt.client_questions(),
    };
    state.attempts.insert(attempt).await;

    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub user_id: Uuid,
    pub answer: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    pub question: String,
    pub your_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnswerResponse {
    #[serde(rename_all = "camelCase")]
    InProgress {
        next_index: usize,
        percent_complete: u8,
    },
    #[serde(rename_all = "camelCase")]
    Completed {
        score: usize,
        total_questions: usize,
        percentage: u8,
        result_id: Uuid,
        review: Vec<QuestionReview>,
    },
}

/// POST /api/v1/quiz/attempts/:id/answer
///
/// Submits the selection for the current question. The final question's
/// submission completes the attempt and persists the result; this is the
/// only side-effecting transition.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(attempt_id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    match state
        .attempts
        .submit_answer(attempt_id, req.user_id, &req.answer)
        .await?
    {
        Submission::Advanced {
            next_index,
            percent_complete,
        } => Ok(Json(AnswerResponse::InProgress {
            next_index,
            percent_complete,
        })),
        Submission::Completed { attempt, outcome } => {
            let result_id = ledger::finalize(
                &state.db,
                FinalizeParams {
                    user_id: attempt.user_id,
                    role: &attempt.role,
                    difficulty: attempt.difficulty,
                    score: outcome.score,
                    total_questions: outcome.total,
                    answer_log: &outcome.answer_log,
                    existing_result: attempt.retest_of,
                },
            )
            .await?;

            let percentage = ((outcome.score * 100) as f64 / outcome.total as f64).round() as u8;
            let review = attempt
                .questions()
                .iter()
                .zip(&outcome.answer_log)
                .map(|(q, log)| QuestionReview {
                    question: q.question.clone(),
                    your_answer: log.user_answer.clone(),
                    correct_answer: q.correct_answer.clone(),
                    is_correct: log.is_correct,
                    explanation: q.explanation.clone(),
                })
                .collect();

            Ok(Json(AnswerResponse::Completed {
                score: outcome.score,
                total_questions: outcome.total,
                percentage,
                result_id,
                review,
            }))
        }
    }
}

/// DELETE /api/v1/quiz/attempts/:id
///
/// Cancels an in-progress attempt, discarding all state.
pub async fn handle_cancel_attempt(
    State(state): State<AppState>,
    Path(attempt_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    state
        .attempts
        .cancel(attempt_id, params.user_id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| AppError::NotFound(format!("Attempt {attempt_id} not found")))
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub results: Vec<ResultRow>,
}

/// GET /api/v1/quiz/results
pub async fn handle_list_results(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResultsResponse>, AppError> {
    let results = ledger::list_for_user(&state.db, params.user_id).await?;
    Ok(Json(ResultsResponse { results }))
}

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<&'static str>,
}

/// GET /api/v1/quiz/roles
pub async fn handle_list_roles() -> Json<RolesResponse> {
    Json(RolesResponse {
        roles: role_labels(),
    })
}
