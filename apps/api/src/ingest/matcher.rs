//! Role matching — pluggable, trait-based ranking of a skill set against
//! per-role requirement vectors.
//!
//! Default: `CosineRoleMatcher`, cosine similarity over binary skill
//! vectors, scaled to 0–100 and sorted descending.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// One ranked role with its 0–100 match score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleMatch {
    pub role: String,
    pub score: u32,
}

#[async_trait]
pub trait RoleMatcher: Send + Sync {
    /// Scores `skills` against every known role. Returned sequence is
    /// sorted by score descending; roles with no overlap are omitted.
    async fn match_roles(&self, skills: &[String]) -> Result<Vec<RoleMatch>, AppError>;
}

/// Role requirement vectors, expressed in canonical skill labels.
const ROLE_PROFILES: &[(&str, &[&str])] = &[
    (
        "Backend Developer",
        &[
            "Java",
            "Python",
            "Node.js",
            "Express",
            "SQL",
            "PostgreSQL",
            "MongoDB",
            "REST",
            "Docker",
            "Git",
        ],
    ),
    (
        "Frontend Developer",
        &[
            "JavaScript",
            "TypeScript",
            "React",
            "Angular",
            "Vue",
            "HTML",
            "CSS",
            "Git",
        ],
    ),
    (
        "Full Stack Developer",
        &[
            "JavaScript",
            "React",
            "Node.js",
            "Express",
            "SQL",
            "MongoDB",
            "HTML",
            "CSS",
            "Git",
        ],
    ),
    (
        "ML Engineer",
        &[
            "Python",
            "Machine Learning",
            "Deep Learning",
            "TensorFlow",
            "PyTorch",
            "NumPy",
            "Pandas",
            "Docker",
        ],
    ),
    (
        "Data Scientist",
        &[
            "Python",
            "Machine Learning",
            "Pandas",
            "NumPy",
            "Scikit-learn",
            "SQL",
            "Deep Learning",
        ],
    ),
    (
        "Data Engineer",
        &[
            "Python",
            "SQL",
            "PostgreSQL",
            "MySQL",
            "Kafka",
            "Spark",
            "AWS",
            "Docker",
        ],
    ),
    (
        "Java Developer",
        &["Java", "Spring", "SQL", "MySQL", "REST", "Git"],
    ),
    (
        "Python Developer",
        &["Python", "Django", "Flask", "FastAPI", "SQL", "REST", "Git"],
    ),
    (
        "DevOps Engineer",
        &[
            "Docker",
            "Kubernetes",
            "Terraform",
            "Jenkins",
            "AWS",
            "Linux",
            "CI/CD",
            "Git",
        ],
    ),
    (
        "Cloud Engineer",
        &[
            "AWS",
            "Azure",
            "GCP",
            "Kubernetes",
            "Terraform",
            "Docker",
            "Linux",
        ],
    ),
    (
        "Mobile Developer",
        &[
            "Android",
            "iOS",
            "Flutter",
            "React Native",
            "Kotlin",
            "Swift",
        ],
    ),
    (
        "QA / Test Engineer",
        &["Selenium", "Python", "Java", "CI/CD", "Git"],
    ),
    (
        "Blockchain Developer",
        &["Solidity", "Blockchain", "JavaScript", "Rust"],
    ),
    (
        "NLP Engineer",
        &["Python", "NLP", "Machine Learning", "PyTorch", "TensorFlow"],
    ),
];

/// Labels of every role this service can match and quiz on.
pub fn role_labels() -> Vec<&'static str> {
    ROLE_PROFILES.iter().map(|(label, _)| *label).collect()
}

pub struct CosineRoleMatcher;

#[async_trait]
impl RoleMatcher for CosineRoleMatcher {
    async fn match_roles(&self, skills: &[String]) -> Result<Vec<RoleMatch>, AppError> {
        Ok(rank_roles(skills))
    }
}

fn rank_roles(skills: &[String]) -> Vec<RoleMatch> {
    let mut matches: Vec<RoleMatch> = ROLE_PROFILES
        .iter()
        .filter_map(|(role, required)| {
            let score = cosine_score(skills, required);
            (score > 0).then(|| RoleMatch {
                role: role.to_string(),
                score,
            })
        })
        .collect();

    // Descending by score; ties broken by label for a stable ranking.
    matches.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.role.cmp(&b.role)));
    matches
}

/// Cosine similarity of two binary skill vectors, scaled to 0–100.
fn cosine_score(skills: &[String], required: &[&str]) -> u32 {
    if skills.is_empty() || required.is_empty() {
        return 0;
    }
    let overlap = required
        .iter()
        .filter(|r| skills.iter().any(|s| s == *r))
        .count();
    let denom = (skills.len() as f64).sqrt() * (required.len() as f64).sqrt();
    ((overlap as f64 / denom) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_identical_vector_scores_100() {
        let s = skills(&["Solidity", "Blockchain", "JavaScript", "Rust"]);
        let ranked = rank_roles(&s);
        assert_eq!(ranked[0].role, "Blockchain Developer");
        assert_eq!(ranked[0].score, 100);
    }

    #[test]
    fn test_sorted_descending() {
        let s = skills(&["Python", "SQL", "Docker"]);
        let ranked = rank_roles(&s);
        assert!(!ranked.is_empty());
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_scores_bounded_0_to_100() {
        let s = skills(&["Python", "SQL", "AWS", "Docker", "Kafka", "Spark"]);
        for m in rank_roles(&s) {
            assert!(m.score <= 100);
            assert!(m.score > 0);
        }
    }

    #[test]
    fn test_disjoint_roles_omitted() {
        let s = skills(&["Flutter", "Swift"]);
        let ranked = rank_roles(&s);
        assert!(ranked.iter().all(|m| m.role == "Mobile Developer"));
    }

    #[test]
    fn test_empty_skills_rank_nothing() {
        assert!(rank_roles(&[]).is_empty());
    }

    #[test]
    fn test_data_skills_rank_data_engineer_first() {
        let s = skills(&["Python", "SQL", "PostgreSQL", "Kafka", "Spark"]);
        let ranked = rank_roles(&s);
        assert_eq!(ranked[0].role, "Data Engineer");
    }

    #[test]
    fn test_tie_break_is_stable_by_label() {
        let s = skills(&["Git"]);
        let ranked = rank_roles(&s);
        let tied: Vec<_> = ranked
            .windows(2)
            .filter(|p| p[0].score == p[1].score)
            .collect();
        for pair in tied {
            assert!(pair[0].role < pair[1].role);
        }
    }
}
