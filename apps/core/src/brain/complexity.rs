//! Question complexity scoring.
//!
//! Buckets a message into simple / medium / complex from word count,
//! question marks, indicator phrases and technical vocabulary. The level
//! drives the system prompt and whether a provider's reasoning model is used.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Technical terms that indicate complexity
const TECHNICAL_TERMS: &[&str] = &[
    // Programming
    "algorithm",
    "function",
    "variable",
    "parameter",
    "class",
    "object",
    "interface",
    "recursion",
    "asynchronous",
    "concurrent",
    "thread",
    "mutex",
    "deadlock",
    "race condition",
    "compiler",
    "syntax",
    // Data structures
    "array",
    "hashmap",
    "linked list",
    "binary tree",
    "graph",
    "queue",
    "stack",
    "heap",
    // Systems
    "api",
    "database",
    "cache",
    "query",
    "transaction",
    "schema",
    "microservice",
    "kubernetes",
    "docker",
    "network",
    "protocol",
    // Science
    "quantum",
    "relativity",
    "thermodynamics",
    "equation",
    "theorem",
    "derivative",
    "integral",
    "probability",
    "statistics",
    "neural network",
    "machine learning",
];

/// Phrases that ask for analysis rather than recall
const REASONING_INDICATORS: &[&str] = &[
    "analyze",
    "analyse",
    "evaluate",
    "synthesize",
    "compare",
    "contrast",
    "critique",
    "pros and cons",
    "advantages and disadvantages",
    "explain how",
    "explain why",
    "step by step",
    "prove",
];

/// Words that route a request to a provider's reasoning model even when short
const REASONING_MODEL_HINTS: &[&str] = &[
    "code",
    "program",
    "debug",
    "programming",
    "python",
    "javascript",
    "rust",
    "sql",
    "script",
    "implement",
    "bug",
    "logic",
    "reason",
    "philosophy",
    "theory",
    "physics",
    "chemistry",
    "math",
    "formula",
    "proof",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    Simple,
    Medium,
    Complex,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityAssessment {
    pub level: ComplexityLevel,
    pub word_count: usize,
    pub question_marks: usize,
    /// Detected technical terms
    pub technical_terms: Vec<String>,
    /// Whether the provider's reasoning model should answer
    pub use_reasoning_model: bool,
}

/// Complexity scorer for incoming questions
pub struct ComplexityScorer {
    technical_terms: HashSet<&'static str>,
}

impl Default for ComplexityScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplexityScorer {
    pub fn new() -> Self {
        Self {
            technical_terms: TECHNICAL_TERMS.iter().copied().collect(),
        }
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric() && c != '-' && c != '_')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }

    fn find_technical_terms(&self, words: &[String]) -> Vec<String> {
        let joined = format!(" {} ", words.join(" "));
        let mut found: Vec<String> = self
            .technical_terms
            .iter()
            .filter(|term| joined.contains(&format!(" {} ", term)))
            .map(|term| term.to_string())
            .collect();
        found.sort();
        found
    }

    pub fn assess(&self, text: &str) -> ComplexityAssessment {
        let words = self.tokenize(text);
        let lowered = text.to_lowercase();
        let word_count = words.len();
        let question_marks = text.matches('?').count();
        let technical_terms = self.find_technical_terms(&words);

        let has_indicator = REASONING_INDICATORS.iter().any(|p| lowered.contains(p));

        let level = if has_indicator
            || word_count > 20
            || question_marks > 1
            || technical_terms.len() >= 3
        {
            ComplexityLevel::Complex
        } else if word_count > 10 || question_marks == 1 || !technical_terms.is_empty() {
            ComplexityLevel::Medium
        } else {
            ComplexityLevel::Simple
        };

        let use_reasoning_model = level == ComplexityLevel::Complex
            || words
                .iter()
                .any(|w| REASONING_MODEL_HINTS.contains(&w.as_str()));

        ComplexityAssessment {
            level,
            word_count,
            question_marks,
            technical_terms,
            use_reasoning_model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_text() {
        let scorer = ComplexityScorer::new();

        let result = scorer.assess("tell me a joke");
        assert_eq!(result.level, ComplexityLevel::Simple);
        assert_eq!(result.word_count, 4);
        assert!(!result.use_reasoning_model);
    }

    #[test]
    fn test_single_question_is_medium() {
        let scorer = ComplexityScorer::new();

        assert_eq!(scorer.assess("Where is Paris?").level, ComplexityLevel::Medium);
    }

    #[test]
    fn test_complex_text() {
        let scorer = ComplexityScorer::new();

        let result = scorer.assess("Compare the pros and cons of microservices and monoliths");
        assert_eq!(result.level, ComplexityLevel::Complex);
        assert!(result.use_reasoning_model);

        let result = scorer.assess("What is a mutex? How does a deadlock happen?");
        assert_eq!(result.level, ComplexityLevel::Complex);
        assert!(result.technical_terms.contains(&"mutex".to_string()));
    }

    #[test]
    fn test_code_hint_selects_reasoning_model() {
        let scorer = ComplexityScorer::new();

        let result = scorer.assess("fix my python script");
        assert_eq!(result.level, ComplexityLevel::Simple);
        assert!(result.use_reasoning_model);
    }

    #[test]
    fn test_technical_terms_match_whole_words() {
        let scorer = ComplexityScorer::new();

        // "capital" must not match "api"
        let result = scorer.assess("capital of france");
        assert!(result.technical_terms.is_empty());
    }

    #[test]
    fn test_empty_text() {
        let scorer = ComplexityScorer::new();

        let result = scorer.assess("");
        assert_eq!(result.level, ComplexityLevel::Simple);
        assert_eq!(result.word_count, 0);
    }
}
