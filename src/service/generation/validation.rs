//! Validation for LLM-generated maturity content
//!
//! Drafts must be structurally complete and free of assistant meta-language
//! before they are returned to the caller.

use regex::Regex;

use crate::model::generation::GeneratedContent;

/// Meta-language that indicates an ungrounded or chatty draft
const BANNED_PHRASES: &[&str] = &[
    "as an ai",
    "language model",
    "i cannot",
    "i am unable",
    "based on the advisory",
];

/// Expected number of level descriptors per criterion
const LEVEL_DESCRIPTOR_COUNT: usize = 5;

/// Result of draft validation
#[derive(Debug)]
pub struct GenerationValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl GenerationValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

/// Validate generated content for structural completeness and banned phrasing
pub fn validate_generated_content(content: &GeneratedContent) -> GenerationValidationResult {
    let mut result = GenerationValidationResult::valid();

    if content.practice_statements.is_empty() {
        result.add_error("Generated content contains no practice statements".to_string());
        return result;
    }

    for (i, statement) in content.practice_statements.iter().enumerate() {
        if statement.name.trim().is_empty() {
            result.add_error(format!("Practice statement {} has an empty name", i + 1));
        }

        if statement.intent.trim().is_empty() {
            result.add_warning(format!(
                "Practice statement '{}' has no intent text",
                statement.name
            ));
        }

        if statement.criteria.is_empty() {
            result.add_error(format!(
                "Practice statement '{}' has no criteria",
                statement.name
            ));
        }

        for (j, criterion) in statement.criteria.iter().enumerate() {
            if criterion.statement.trim().is_empty() {
                result.add_error(format!(
                    "Criterion {} of '{}' has an empty statement",
                    j + 1,
                    statement.name
                ));
            }

            if criterion.level_descriptors.len() != LEVEL_DESCRIPTOR_COUNT {
                result.add_error(format!(
                    "Criterion {} of '{}' has {} level descriptors, expected {}",
                    j + 1,
                    statement.name,
                    criterion.level_descriptors.len(),
                    LEVEL_DESCRIPTOR_COUNT
                ));
            }
        }
    }

    let text = collect_text(content);
    if let Some(phrase) = BANNED_PHRASES
        .iter()
        .find(|phrase| text.contains(*phrase))
    {
        result.add_error(format!(
            "Generated content contains banned phrase '{}'",
            phrase
        ));
    }

    result
}

/// Strip banned phrases from free-text fields of a draft that failed only
/// on phrasing during the final attempt
pub fn sanitize_text(text: &str) -> String {
    let mut sanitized = text.to_string();
    let whitespace_regex = Regex::new(r"\s+").unwrap();

    for phrase in BANNED_PHRASES {
        let pattern = Regex::new(&format!(r"(?i){}", regex::escape(phrase))).unwrap();
        sanitized = pattern.replace_all(&sanitized, "").to_string();
    }

    whitespace_regex
        .replace_all(&sanitized, " ")
        .trim()
        .to_string()
}

/// Sanitize every free-text field of a draft
pub fn sanitize_content(content: &GeneratedContent) -> GeneratedContent {
    let mut cleaned = content.clone();
    for statement in &mut cleaned.practice_statements {
        statement.name = sanitize_text(&statement.name);
        statement.intent = sanitize_text(&statement.intent);
        statement.reasoning = statement.reasoning.as_deref().map(sanitize_text);
        for criterion in &mut statement.criteria {
            criterion.statement = sanitize_text(&criterion.statement);
        }
    }
    cleaned
}

fn collect_text(content: &GeneratedContent) -> String {
    let mut text = String::new();
    for statement in &content.practice_statements {
        text.push_str(&statement.name);
        text.push(' ');
        text.push_str(&statement.intent);
        text.push(' ');
        if let Some(reasoning) = &statement.reasoning {
            text.push_str(reasoning);
            text.push(' ');
        }
        for criterion in &statement.criteria {
            text.push_str(&criterion.statement);
            text.push(' ');
        }
    }
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::generation::{GeneratedCriterion, GeneratedPracticeStatement};

    fn content(descriptors: usize) -> GeneratedContent {
        GeneratedContent {
            practice_statements: vec![GeneratedPracticeStatement {
                name: "Incident Triage".to_string(),
                intent: "Incidents are triaged consistently".to_string(),
                criteria: vec![GeneratedCriterion {
                    statement: "Triage runbooks exist and are followed".to_string(),
                    level_descriptors: (0..descriptors).map(|i| format!("level {}", i)).collect(),
                }],
                reasoning: None,
            }],
        }
    }

    #[test]
    fn test_complete_draft_is_valid() {
        let result = validate_generated_content(&content(5));
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_wrong_descriptor_count_rejected() {
        let result = validate_generated_content(&content(3));
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("level descriptors"));
    }

    #[test]
    fn test_empty_statements_rejected() {
        let empty = GeneratedContent {
            practice_statements: vec![],
        };
        let result = validate_generated_content(&empty);
        assert!(!result.is_valid);
    }

    #[test]
    fn test_banned_phrase_rejected() {
        let mut draft = content(5);
        draft.practice_statements[0].intent =
            "As an AI, I cannot verify this practice".to_string();
        let result = validate_generated_content(&draft);
        assert!(!result.is_valid);
    }

    #[test]
    fn test_sanitize_removes_banned_phrases() {
        let cleaned = sanitize_text("Practices exist. As an AI, this is a draft.");
        assert!(!cleaned.to_lowercase().contains("as an ai"));
        assert!(cleaned.contains("Practices exist."));
    }
}
