//! Question provider — pluggable source of scored quiz questions.
//!
//! Default: `LlmQuestionProvider`, which prompts the LLM client for a JSON
//! question array and validates every question before handing it to the
//! attempt runner. Generation failure never produces a partial attempt.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::prompts::{QUIZ_GENERATION_PROMPT, QUIZ_GENERATION_SYSTEM};
use crate::llm_client::LlmClient;

/// Three-level ordinal difficulty. Defaults to Medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Low,
    #[default]
    Medium,
    High,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Low => "Low",
            Difficulty::Medium => "Medium",
            Difficulty::High => "High",
        }
    }

    /// Questions per attempt at this difficulty.
    pub fn question_count(&self) -> usize {
        match self {
            Difficulty::Low => 5,
            Difficulty::Medium => 8,
            Difficulty::High => 10,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Mcq,
    Snippet,
}

/// One scored question. `correct_answer` is always one of `options`; it is
/// never serialized to the attempt client (see `ClientQuestion`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Returns a finite ordered list of questions for the role/difficulty,
    /// or `Generation` if the backend fails or yields nothing usable.
    async fn generate(&self, role: &str, difficulty: Difficulty)
        -> Result<Vec<Question>, AppError>;
}

pub struct LlmQuestionProvider {
    llm: LlmClient,
}

impl LlmQuestionProvider {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl QuestionProvider for LlmQuestionProvider {
    async fn generate(
        &self,
        role: &str,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>, AppError> {
        let prompt = QUIZ_GENERATION_PROMPT
            .replace("{count}", &difficulty.question_count().to_string())
            .replace("{role}", role)
            .replace("{difficulty}", difficulty.as_str());

        let raw: Vec<Question> = self
            .llm
            .call_json(&prompt, QUIZ_GENERATION_SYSTEM)
            .await
            .map_err(|e| AppError::Generation(e.to_string()))?;

        let questions = keep_valid(raw);
        if questions.is_empty() {
            return Err(AppError::Generation(
                "provider returned no usable questions".to_string(),
            ));
        }
        Ok(questions)
    }
}

fn keep_valid(raw: Vec<Question>) -> Vec<Question> {
    raw.into_iter()
        .filter(|q| match validate_question(q) {
            Ok(()) => true,
            Err(reason) => {
                warn!("Discarding generated question: {reason}");
                false
            }
        })
        .collect()
}

fn validate_question(q: &Question) -> Result<(), String> {
    if q.question.trim().is_empty() {
        return Err("empty question text".to_string());
    }
    if q.options.len() < 2 {
        return Err("fewer than two options".to_string());
    }
    if q.options.iter().any(|o| o.trim().is_empty()) {
        return Err("blank option".to_string());
    }
    if !q.options.iter().any(|o| o == &q.correct_answer) {
        return Err("correct answer not among options".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_question(correct: &str, options: &[&str]) -> Question {
        Question {
            kind: QuestionKind::Mcq,
            question: "What does HTTP 404 mean?".to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct.to_string(),
            explanation: "The server cannot find the requested resource.".to_string(),
        }
    }

    #[test]
    fn test_valid_question_passes() {
        let q = make_question("Not Found", &["Not Found", "Forbidden", "Gone", "Teapot"]);
        assert!(validate_question(&q).is_ok());
    }

    #[test]
    fn test_correct_answer_must_be_an_option() {
        let q = make_question("Moved", &["Not Found", "Forbidden"]);
        assert!(validate_question(&q).is_err());
    }

    #[test]
    fn test_correct_answer_match_is_case_sensitive() {
        let q = make_question("not found", &["Not Found", "Forbidden"]);
        assert!(validate_question(&q).is_err());
    }

    #[test]
    fn test_too_few_options_rejected() {
        let q = make_question("Not Found", &["Not Found"]);
        assert!(validate_question(&q).is_err());
    }

    #[test]
    fn test_keep_valid_filters_only_broken_questions() {
        let good = make_question("A", &["A", "B", "C", "D"]);
        let bad = make_question("Z", &["A", "B"]);
        let kept = keep_valid(vec![good.clone(), bad]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].correct_answer, good.correct_answer);
    }

    #[test]
    fn test_question_json_shape_matches_provider_contract() {
        let json = r#"{
            "type": "snippet",
            "question": "let x = [1,2].pop(); what is x?",
            "options": ["1", "2", "undefined", "error"],
            "correctAnswer": "2",
            "explanation": "pop removes and returns the last element."
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.kind, QuestionKind::Snippet);
        assert_eq!(q.correct_answer, "2");
        assert!(validate_question(&q).is_ok());
    }

    #[test]
    fn test_difficulty_default_is_medium() {
        assert_eq!(Difficulty::default(), Difficulty::Medium);
        assert_eq!(Difficulty::default().as_str(), "Medium");
    }

    #[test]
    fn test_question_count_grows_with_difficulty() {
        assert!(Difficulty::Low.question_count() < Difficulty::Medium.question_count());
        assert!(Difficulty::Medium.question_count() < Difficulty::High.question_count());
    }
}
