//! The quiz attempt state machine.
//!
//! A `QuizAttempt` is an explicit state value: cursor over an ordered
//! question list plus an accumulating answer map. It lives only in the
//! in-memory attempt store; nothing is persisted until completion, and a
//! crash or cancel mid-attempt loses all progress.
//!
//! Correct answers stay inside this value. Clients only ever see
//! `ClientQuestion`, and the authoritative score is computed here from the
//! raw submitted answers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::errors::AppError;
use crate::quiz::provider::{Difficulty, Question, QuestionKind};

/// Per-question entry of the finalize answer log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerLogEntry {
    pub question_index: usize,
    /// The submitted answer, or an empty string if the index was never
    /// answered.
    pub user_answer: String,
    pub is_correct: bool,
}

/// Client-facing view of a question: the correct answer and explanation are
/// withheld until the attempt completes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientQuestion {
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptError {
    /// Advancing requires a non-empty selection; the cursor is unmoved.
    EmptySelection,
    /// The attempt already completed; no further submissions are accepted.
    AlreadyCompleted,
}

/// Result of one answer submission.
#[derive(Debug, Clone)]
pub enum Progress {
    Advanced {
        next_index: usize,
        percent_complete: u8,
    },
    Completed(AttemptOutcome),
}

/// Terminal data of a completed attempt, handed to the result ledger.
#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    pub score: usize,
    pub total: usize,
    pub answer_log: Vec<AnswerLogEntry>,
}

/// One in-flight quiz attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub difficulty: Difficulty,
    /// Result row being retested, if any; carried through to finalize.
    pub retest_of: Option<Uuid>,
    questions: Vec<Question>,
    cursor: usize,
    answers: BTreeMap<usize, String>,
    completed: bool,
}

impl QuizAttempt {
    pub fn new(
        user_id: Uuid,
        role: String,
        difficulty: Difficulty,
        retest_of: Option<Uuid>,
        questions: Vec<Question>,
    ) -> Result<Self, AppError> {
        if questions.is_empty() {
            return Err(AppError::Generation(
                "an attempt requires at least one question".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            role,
            difficulty,
            retest_of,
            questions,
            cursor: 0,
            answers: BTreeMap::new(),
            completed: false,
        })
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn client_questions(&self) -> Vec<ClientQuestion> {
        self.questions
            .iter()
            .map(|q| ClientQuestion {
                kind: q.kind,
                question: q.question.clone(),
                options: q.options.clone(),
            })
            .collect()
    }

    /// Completion percentage over answered questions, including the one
    /// just submitted.
    pub fn progress_percent(&self) -> u8 {
        ((self.answers.len() * 100) as f64 / self.total() as f64).round() as u8
    }

    /// Records the selection for the current question and advances the
    /// cursor; the final question's submission completes the attempt.
    pub fn submit_answer(&mut self, answer: &str) -> Result<Progress, AttemptError> {
        if self.completed {
            return Err(AttemptError::AlreadyCompleted);
        }
        if answer.trim().is_empty() {
            return Err(AttemptError::EmptySelection);
        }

        self.answers.insert(self.cursor, answer.to_string());

        if self.cursor + 1 < self.questions.len() {
            self.cursor += 1;
            Ok(Progress::Advanced {
                next_index: self.cursor,
                percent_complete: self.progress_percent(),
            })
        } else {
            self.completed = true;
            Ok(Progress::Completed(self.outcome()))
        }
    }

    /// Authoritative score: count of indices whose submitted answer exactly
    /// equals the recorded correct answer. Case-sensitive, no partial
    /// credit.
    pub fn score(&self) -> usize {
        self.questions
            .iter()
            .enumerate()
            .filter(|(i, q)| self.answers.get(i) == Some(&q.correct_answer))
            .count()
    }

    /// Per-question log of (index, submitted-or-empty, correctness).
    pub fn answer_log(&self) -> Vec<AnswerLogEntry> {
        self.questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let user_answer = self.answers.get(&i).cloned().unwrap_or_default();
                let is_correct = user_answer == q.correct_answer;
                AnswerLogEntry {
                    question_index: i,
                    user_answer,
                    is_correct,
                }
            })
            .collect()
    }

    fn outcome(&self) -> AttemptOutcome {
        AttemptOutcome {
            score: self.score(),
            total: self.total(),
            answer_log: self.answer_log(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_question(prompt: &str, correct: &str) -> Question {
        Question {
            kind: QuestionKind::Mcq,
            question: prompt.to_string(),
            options: vec![
                correct.to_string(),
                "wrong-1".to_string(),
                "wrong-2".to_string(),
                "wrong-3".to_string(),
            ],
            correct_answer: correct.to_string(),
            explanation: "because".to_string(),
        }
    }

    fn make_attempt(n: usize) -> QuizAttempt {
        let questions = (0..n)
            .map(|i| make_question(&format!("q{i}"), &format!("right-{i}")))
            .collect();
        QuizAttempt::new(
            Uuid::new_v4(),
            "Backend Developer".to_string(),
            Difficulty::Medium,
            None,
            questions,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_question_list_is_rejected() {
        let err = QuizAttempt::new(
            Uuid::new_v4(),
            "Backend Developer".to_string(),
            Difficulty::Low,
            None,
            vec![],
        );
        assert!(matches!(err, Err(AppError::Generation(_))));
    }

    #[test]
    fn test_five_question_attempt_scores_three() {
        // Answers 0, 1, 3 correct; 2, 4 incorrect.
        let mut attempt = make_attempt(5);
        let picks = ["right-0", "right-1", "nope", "right-3", "nope"];
        let mut last = None;
        for pick in picks {
            last = Some(attempt.submit_answer(pick).unwrap());
        }
        match last.unwrap() {
            Progress::Completed(outcome) => {
                assert_eq!(outcome.score, 3);
                assert_eq!(outcome.total, 5);
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn test_scoring_is_case_sensitive_exact_match() {
        let mut attempt = make_attempt(1);
        match attempt.submit_answer("RIGHT-0").unwrap() {
            Progress::Completed(outcome) => assert_eq!(outcome.score, 0),
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_selection_does_not_advance() {
        let mut attempt = make_attempt(3);
        assert!(matches!(
            attempt.submit_answer("   "),
            Err(AttemptError::EmptySelection)
        ));
        assert_eq!(attempt.cursor(), 0);
        assert_eq!(attempt.answered(), 0);
    }

    #[test]
    fn test_completed_attempt_rejects_submissions() {
        let mut attempt = make_attempt(1);
        attempt.submit_answer("right-0").unwrap();
        assert!(matches!(
            attempt.submit_answer("right-0"),
            Err(AttemptError::AlreadyCompleted)
        ));
    }

    #[test]
    fn test_progress_percent_rounds() {
        let mut attempt = make_attempt(3);
        attempt.submit_answer("a").unwrap();
        // 1/3 → 33.33 → 33
        assert_eq!(attempt.progress_percent(), 33);
        attempt.submit_answer("b").unwrap();
        // 2/3 → 66.67 → 67
        assert_eq!(attempt.progress_percent(), 67);
    }

    #[test]
    fn test_final_submission_counts_toward_progress() {
        let mut attempt = make_attempt(2);
        attempt.submit_answer("right-0").unwrap();
        assert_eq!(attempt.progress_percent(), 50);
        attempt.submit_answer("right-1").unwrap();
        assert_eq!(attempt.progress_percent(), 100);
        assert!(attempt.is_completed());
    }

    #[test]
    fn test_answer_log_shape() {
        let mut attempt = make_attempt(2);
        attempt.submit_answer("right-0").unwrap();
        attempt.submit_answer("wrong").unwrap();
        let log = attempt.answer_log();
        assert_eq!(
            log,
            vec![
                AnswerLogEntry {
                    question_index: 0,
                    user_answer: "right-0".to_string(),
                    is_correct: true,
                },
                AnswerLogEntry {
                    question_index: 1,
                    user_answer: "wrong".to_string(),
                    is_correct: false,
                },
            ]
        );
    }

    #[test]
    fn test_answer_log_serializes_camel_case() {
        let entry = AnswerLogEntry {
            question_index: 0,
            user_answer: "x".to_string(),
            is_correct: false,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("questionIndex").is_some());
        assert!(json.get("userAnswer").is_some());
        assert!(json.get("isCorrect").is_some());
    }

    #[test]
    fn test_client_questions_never_expose_correct_answers() {
        let attempt = make_attempt(2);
        let json = serde_json::to_string(&attempt.client_questions()).unwrap();
        assert!(!json.contains("correctAnswer"));
        assert!(!json.contains("explanation"));
        assert!(!json.contains("because"));
    }

    #[test]
    fn test_repeated_identical_options_score_once_per_question() {
        let q = Question {
            kind: QuestionKind::Mcq,
            question: "pick".to_string(),
            options: vec!["same".to_string(), "same".to_string(), "other".to_string()],
            correct_answer: "same".to_string(),
            explanation: "dup options".to_string(),
        };
        let mut attempt = QuizAttempt::new(
            Uuid::new_v4(),
            "QA / Test Engineer".to_string(),
            Difficulty::Low,
            None,
            vec![q],
        )
        .unwrap();
        match attempt.submit_answer("same").unwrap() {
            Progress::Completed(outcome) => assert_eq!(outcome.score, 1),
            other => panic!("expected completion, got {other:?}"),
        }
    }
}
