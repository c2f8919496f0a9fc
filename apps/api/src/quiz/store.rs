//! In-memory store of in-flight quiz attempts.
//!
//! Attempts are per-session and non-durable: a process restart loses all
//! in-flight state, and an attempt is cheap to restart through the
//! question provider. Completed attempts leave the store immediately.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::quiz::attempt::{AttemptError, AttemptOutcome, Progress, QuizAttempt};

/// Result of routing one answer submission through the store.
pub enum Submission {
    Advanced {
        next_index: usize,
        percent_complete: u8,
    },
    /// The attempt completed and was removed from the store; the caller
    /// owns it now and is responsible for finalization.
    Completed {
        attempt: QuizAttempt,
        outcome: AttemptOutcome,
    },
}

#[derive(Clone, Default)]
pub struct AttemptStore {
    inner: Arc<RwLock<HashMap<Uuid, QuizAttempt>>>,
}

impl AttemptStore {
    pub async fn insert(&self, attempt: QuizAttempt) {
        self.inner.write().await.insert(attempt.id, attempt);
    }

    /// Discards the attempt if it exists and belongs to the caller.
    pub async fn cancel(&self, attempt_id: Uuid, user_id: Uuid) -> Option<QuizAttempt> {
        let mut map = self.inner.write().await;
        if map.get(&attempt_id).is_some_and(|a| a.user_id == user_id) {
            map.remove(&attempt_id)
        } else {
            None
        }
    }

    /// Applies one answer submission under the write lock. Unknown ids and
    /// foreign-owned attempts are indistinguishable to the caller.
    pub async fn submit_answer(
        &self,
        attempt_id: Uuid,
        user_id: Uuid,
        answer: &str,
    ) -> Result<Submission, AppError> {
        let mut map = self.inner.write().await;

        let mut attempt = match map.remove(&attempt_id) {
            Some(a) if a.user_id == user_id => a,
            Some(a) => {
                map.insert(attempt_id, a);
                return Err(not_found(attempt_id));
            }
            None => return Err(not_found(attempt_id)),
        };

        match attempt.submit_answer(answer) {
            Ok(Progress::Advanced {
                next_index,
                percent_complete,
            }) => {
                map.insert(attempt_id, attempt);
                Ok(Submission::Advanced {
                    next_index,
                    percent_complete,
                })
            }
            Ok(Progress::Completed(outcome)) => Ok(Submission::Completed { attempt, outcome }),
            Err(AttemptError::EmptySelection) => {
                map.insert(attempt_id, attempt);
                Err(AppError::Validation(
                    "An answer selection is required before advancing.".to_string(),
                ))
            }
            Err(AttemptError::AlreadyCompleted) => {
                map.insert(attempt_id, attempt);
                Err(AppError::Conflict(
                    "This attempt has already been completed.".to_string(),
                ))
            }
        }
    }
}

fn not_found(attempt_id: Uuid) -> AppError {
    AppError::NotFound(format!("Attempt {attempt_id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::provider::{Difficulty, Question, QuestionKind};

    fn make_attempt(user_id: Uuid) -> QuizAttempt {
        let questions = vec![Question {
            kind: QuestionKind::Mcq,
            question: "q".to_string(),
            options: vec!["a".to_string(), "b".to_string()],
            correct_answer: "a".to_string(),
            explanation: "e".to_string(),
        }];
        QuizAttempt::new(
            user_id,
            "Backend Developer".to_string(),
            Difficulty::Low,
            None,
            questions,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_completion_removes_attempt() {
        let store = AttemptStore::default();
        let user_id = Uuid::new_v4();
        let attempt = make_attempt(user_id);
        let id = attempt.id;
        store.insert(attempt).await;

        match store.submit_answer(id, user_id, "a").await.unwrap() {
            Submission::Completed { outcome, .. } => assert_eq!(outcome.score, 1),
            Submission::Advanced { .. } => panic!("expected completion"),
        }
        assert!(matches!(
            store.submit_answer(id, user_id, "a").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_foreign_user_cannot_touch_attempt() {
        let store = AttemptStore::default();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let attempt = make_attempt(owner);
        let id = attempt.id;
        store.insert(attempt).await;

        assert!(matches!(
            store.submit_answer(id, stranger, "a").await,
            Err(AppError::NotFound(_))
        ));
        assert!(store.cancel(id, stranger).await.is_none());
        // still present for the owner
        assert!(store.cancel(id, owner).await.is_some());
    }

    #[tokio::test]
    async fn test_cancel_discards_all_state() {
        let store = AttemptStore::default();
        let user_id = Uuid::new_v4();
        let attempt = make_attempt(user_id);
        let id = attempt.id;
        store.insert(attempt).await;

        assert!(store.cancel(id, user_id).await.is_some());
        assert!(matches!(
            store.submit_answer(id, user_id, "a").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_selection_keeps_attempt_alive() {
        let store = AttemptStore::default();
        let user_id = Uuid::new_v4();
        let attempt = make_attempt(user_id);
        let id = attempt.id;
        store.insert(attempt).await;

        assert!(matches!(
            store.submit_answer(id, user_id, "").await,
            Err(AppError::Validation(_))
        ));
        // the rejected submission was a no-op
        match store.submit_answer(id, user_id, "a").await.unwrap() {
            Submission::Completed { outcome, .. } => assert_eq!(outcome.total, 1),
            Submission::Advanced { .. } => panic!("expected completion"),
        }
    }
}
