//! Skill extraction — pluggable, trait-based mapping from resume text to
//! canonical skill labels.
//!
//! Default: `LexiconSkillExtractor` (pure-Rust, deterministic, fully
//! testable). `AppState` holds an `Arc<dyn SkillExtractor>`, so an
//! LLM-backed extractor can be swapped in at startup.

use async_trait::async_trait;

use crate::errors::AppError;

#[async_trait]
pub trait SkillExtractor: Send + Sync {
    /// Returns canonical skill labels found in `text`, ordered and
    /// deduplicated. An empty result is valid and meaningful (the document
    /// carries no recognizable skills).
    async fn extract_skills(&self, text: &str) -> Result<Vec<String>, AppError>;

    /// Returns the programming-language subset of `skills`, preserving
    /// order. Always a subset of the input.
    async fn programming_languages(&self, skills: &[String]) -> Result<Vec<String>, AppError>;
}

struct SkillDef {
    label: &'static str,
    aliases: &'static [&'static str],
    is_language: bool,
}

const fn skill(label: &'static str, aliases: &'static [&'static str]) -> SkillDef {
    SkillDef {
        label,
        aliases,
        is_language: false,
    }
}

const fn lang(label: &'static str, aliases: &'static [&'static str]) -> SkillDef {
    SkillDef {
        label,
        aliases,
        is_language: true,
    }
}

/// Canonical skill lexicon. Scan order defines the order of the extracted
/// skill sequence. Single-token aliases match whole tokens only, so "Java"
/// never fires on "JavaScript"; multi-word aliases match as substrings of
/// the normalized text.
const SKILL_LEXICON: &[SkillDef] = &[
    lang("Python", &["python"]),
    lang("Java", &["java"]),
    lang("JavaScript", &["javascript"]),
    lang("TypeScript", &["typescript"]),
    lang("C", &["c"]),
    lang("C++", &["c++", "cpp"]),
    lang("C#", &["c#", "csharp"]),
    lang("Go", &["golang"]),
    lang("Rust", &["rust"]),
    lang("Kotlin", &["kotlin"]),
    lang("Swift", &["swift"]),
    lang("Ruby", &["ruby"]),
    lang("PHP", &["php"]),
    lang("Scala", &["scala"]),
    skill("SQL", &["sql"]),
    skill("MySQL", &["mysql"]),
    skill("PostgreSQL", &["postgresql", "postgres"]),
    skill("MongoDB", &["mongodb", "mongo"]),
    skill("Redis", &["redis"]),
    skill("HTML", &["html", "html5"]),
    skill("CSS", &["css", "css3"]),
    skill("React", &["react", "reactjs", "react.js"]),
    skill("Angular", &["angular", "angularjs"]),
    skill("Vue", &["vue", "vuejs", "vue.js"]),
    skill("Node.js", &["node", "nodejs", "node.js"]),
    skill("Express", &["express", "expressjs", "express.js"]),
    skill("Django", &["django"]),
    skill("Flask", &["flask"]),
    skill("FastAPI", &["fastapi"]),
    skill("Spring", &["spring", "spring boot"]),
    skill("GraphQL", &["graphql"]),
    skill("REST", &["rest api", "restful"]),
    skill("Machine Learning", &["machine learning"]),
    skill("Deep Learning", &["deep learning"]),
    skill("NLP", &["nlp", "natural language processing"]),
    skill("TensorFlow", &["tensorflow"]),
    skill("PyTorch", &["pytorch"]),
    skill("Pandas", &["pandas"]),
    skill("NumPy", &["numpy"]),
    skill("Scikit-learn", &["scikit-learn", "sklearn"]),
    skill("Kafka", &["kafka"]),
    skill("Spark", &["spark", "pyspark"]),
    skill("Docker", &["docker"]),
    skill("Kubernetes", &["kubernetes", "k8s"]),
    skill("Terraform", &["terraform"]),
    skill("Jenkins", &["jenkins"]),
    skill("CI/CD", &["ci/cd", "continuous integration"]),
    skill("AWS", &["aws", "amazon web services"]),
    skill("Azure", &["azure"]),
    skill("GCP", &["gcp", "google cloud"]),
    skill("Linux", &["linux"]),
    skill("Git", &["git", "github", "gitlab"]),
    skill("Selenium", &["selenium"]),
    skill("Android", &["android"]),
    skill("iOS", &["ios"]),
    skill("Flutter", &["flutter"]),
    skill("React Native", &["react native"]),
    skill("Solidity", &["solidity"]),
    skill("Blockchain", &["blockchain"]),
];

/// Deterministic lexicon-based skill extractor.
pub struct LexiconSkillExtractor;

#[async_trait]
impl SkillExtractor for LexiconSkillExtractor {
    async fn extract_skills(&self, text: &str) -> Result<Vec<String>, AppError> {
        Ok(scan_lexicon(text))
    }

    async fn programming_languages(&self, skills: &[String]) -> Result<Vec<String>, AppError> {
        Ok(language_subset(skills))
    }
}

fn scan_lexicon(text: &str) -> Vec<String> {
    let normalized = text.to_lowercase();
    let tokens = tokenize(&normalized);

    SKILL_LEXICON
        .iter()
        .filter(|def| {
            def.aliases.iter().any(|alias| {
                if alias.contains(' ') {
                    normalized.contains(alias)
                } else {
                    tokens.iter().any(|t| t == alias)
                }
            })
        })
        .map(|def| def.label.to_string())
        .collect()
}

fn language_subset(skills: &[String]) -> Vec<String> {
    skills
        .iter()
        .filter(|s| {
            SKILL_LEXICON
                .iter()
                .any(|def| def.is_language && def.label == s.as_str())
        })
        .cloned()
        .collect()
}

/// Splits lowercased text into tokens, keeping the characters that carry
/// meaning in skill names (`+`, `#`, `.`, `/`) and stripping trailing
/// punctuation so "node.js," tokenizes to "node.js".
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '/')))
        .map(|t| t.trim_matches(|c: char| matches!(c, '.' | '/')))
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_java_does_not_match_javascript() {
        let skills = scan_lexicon("Built frontends in JavaScript and React.");
        assert!(skills.contains(&"JavaScript".to_string()));
        assert!(!skills.contains(&"Java".to_string()));
    }

    #[test]
    fn test_multiword_alias_matches() {
        let skills = scan_lexicon("Applied machine learning to churn prediction");
        assert!(skills.contains(&"Machine Learning".to_string()));
    }

    #[test]
    fn test_alias_maps_to_canonical_label() {
        let skills = scan_lexicon("Deployed to k8s clusters using golang services");
        assert!(skills.contains(&"Kubernetes".to_string()));
        assert!(skills.contains(&"Go".to_string()));
    }

    #[test]
    fn test_punctuation_and_case_insensitive() {
        let skills = scan_lexicon("Skills: PYTHON, Node.js, C++.");
        assert!(skills.contains(&"Python".to_string()));
        assert!(skills.contains(&"Node.js".to_string()));
        assert!(skills.contains(&"C++".to_string()));
    }

    #[test]
    fn test_no_duplicates_and_lexicon_order() {
        let skills = scan_lexicon("python sql python docker sql");
        assert_eq!(skills, vec!["Python", "SQL", "Docker"]);
    }

    #[test]
    fn test_empty_text_yields_empty_set() {
        assert!(scan_lexicon("").is_empty());
        assert!(scan_lexicon("nothing recognizable here").is_empty());
    }

    #[test]
    fn test_languages_are_subset_preserving_order() {
        let skills: Vec<String> = ["Python", "SQL", "Docker"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(language_subset(&skills), vec!["Python"]);
    }

    #[test]
    fn test_languages_exclude_sql_and_tools() {
        let skills: Vec<String> = ["SQL", "Docker", "Git"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(language_subset(&skills).is_empty());
    }

    #[test]
    fn test_sql_alias_inside_word_does_not_fire() {
        // "mysql" must resolve to MySQL, not SQL
        let skills = scan_lexicon("administered mysql instances");
        assert!(skills.contains(&"MySQL".to_string()));
        assert!(!skills.contains(&"SQL".to_string()));
    }
}
