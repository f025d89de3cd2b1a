//! Lexical and structural statistics of a prompt

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Domain a technical term pattern belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermCategory {
    Programming,
    DataAnalysis,
    Writing,
    Academic,
}

static TECHNICAL_PATTERNS: Lazy<Vec<(TermCategory, Regex)>> = Lazy::new(|| {
    let table: [(TermCategory, &str); 12] = [
        (TermCategory::Programming, r"\b(function|class|method|variable|array|object|string|integer|boolean)\b"),
        (TermCategory::Programming, r"\b(python|javascript|java|c\+\+|html|css|sql|api|json|xml)\b"),
        (TermCategory::Programming, r"\b(algorithm|data structure|database|framework|library)\b"),
        (TermCategory::DataAnalysis, r"\b(data|dataset|analysis|statistics|correlation|regression)\b"),
        (TermCategory::DataAnalysis, r"\b(chart|graph|visualization|metrics|kpi|trend)\b"),
        (TermCategory::DataAnalysis, r"\b(pandas|numpy|matplotlib|sql|excel|csv)\b"),
        (TermCategory::Writing, r"\b(article|essay|blog|content|copy|narrative|story)\b"),
        (TermCategory::Writing, r"\b(tone|style|audience|voice|structure|format)\b"),
        (TermCategory::Writing, r"\b(introduction|conclusion|paragraph|thesis|argument)\b"),
        (TermCategory::Academic, r"\b(research|study|theory|hypothesis|methodology|analysis)\b"),
        (TermCategory::Academic, r"\b(citation|reference|literature|review|paper|journal)\b"),
        (TermCategory::Academic, r"\b(abstract|conclusion|findings|results|discussion)\b"),
    ];
    table
        .into_iter()
        .map(|(category, pattern)| (category, Regex::new(pattern).expect("valid technical term pattern")))
        .collect()
});

static SENTENCE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

static IMPERATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(please|write|create|make|do|generate|analyze|explain|describe)\b").expect("valid regex")
});

static EXAMPLE_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(example|for instance|such as|like)\b").expect("valid regex"));

static CONSTRAINT_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(limit|maximum|minimum|within|between)\b").expect("valid regex"));

static CONTEXT_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(given|assuming|context|background|scenario)\b").expect("valid regex"));

/// Assumed syllables per word for the readability estimate
const AVG_SYLLABLES_PER_WORD: f64 = 1.5;

/// Statistics derived from the raw prompt text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptFeatures {
    pub word_count: usize,
    pub sentence_count: usize,
    /// `word_count / max(sentence_count, 1)`
    pub avg_sentence_length: f64,
    pub question_count: usize,
    pub imperative_count: usize,
    /// Matched terms across all categories, deduplicated
    pub technical_terms: BTreeSet<String>,
    /// Categories that contributed at least one term
    pub term_categories: BTreeSet<TermCategory>,
    pub has_examples: bool,
    pub has_constraints: bool,
    pub has_context: bool,
    /// Quantized readability in 0..=10
    pub readability_score: f64,
}

impl PromptFeatures {
    /// Compute all features of `text`. Never fails; empty text yields zeros.
    pub fn extract(text: &str) -> Self {
        let lower = text.to_lowercase();

        let word_count = text.split_whitespace().count();
        let sentence_count = SENTENCE_SPLIT
            .split(text)
            .filter(|s| !s.trim().is_empty())
            .count();
        let avg_sentence_length = word_count as f64 / sentence_count.max(1) as f64;

        let question_count = text.matches('?').count();
        let imperative_count = IMPERATIVE.find_iter(&lower).count();

        let (technical_terms, term_categories) = technical_terms(&lower);

        Self {
            word_count,
            sentence_count,
            avg_sentence_length,
            question_count,
            imperative_count,
            technical_terms,
            term_categories,
            has_examples: EXAMPLE_HINT.is_match(&lower),
            has_constraints: CONSTRAINT_HINT.is_match(&lower),
            has_context: CONTEXT_HINT.is_match(&lower),
            readability_score: readability(avg_sentence_length, word_count),
        }
    }
}

/// Collect technical terms from already-lowercased text
fn technical_terms(lower: &str) -> (BTreeSet<String>, BTreeSet<TermCategory>) {
    let mut terms = BTreeSet::new();
    let mut categories = BTreeSet::new();
    for (category, pattern) in TECHNICAL_PATTERNS.iter() {
        for m in pattern.find_iter(lower) {
            terms.insert(m.as_str().to_string());
            categories.insert(*category);
        }
    }
    (terms, categories)
}

/// Simplified Flesch reading ease, bucketed onto a 0-10 scale
pub fn readability(avg_sentence_length: f64, word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }

    let ease = 206.835 - (1.015 * avg_sentence_length) - (84.6 * AVG_SYLLABLES_PER_WORD);

    match ease {
        e if e >= 90.0 => 10.0,
        e if e >= 80.0 => 9.0,
        e if e >= 70.0 => 8.0,
        e if e >= 60.0 => 7.0,
        e if e >= 50.0 => 6.0,
        e if e >= 30.0 => 5.0,
        e => (e / 30.0 * 5.0).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        let features = PromptFeatures::extract("");
        assert_eq!(features.word_count, 0);
        assert_eq!(features.sentence_count, 0);
        assert_eq!(features.avg_sentence_length, 0.0);
        assert_eq!(features.readability_score, 0.0);
        assert!(features.technical_terms.is_empty());
    }

    #[test]
    fn test_counts() {
        let features = PromptFeatures::extract("Write a poem. Is it short? Please explain why!");
        assert_eq!(features.word_count, 9);
        assert_eq!(features.sentence_count, 3);
        assert_eq!(features.avg_sentence_length, 3.0);
        assert_eq!(features.question_count, 1);
        // write, please, explain
        assert_eq!(features.imperative_count, 3);
    }

    #[test]
    fn test_technical_terms_are_case_insensitive_and_deduplicated() {
        let features =
            PromptFeatures::extract("Write a Python function. The FUNCTION should return JSON data.");
        let expected: BTreeSet<String> = ["python", "function", "json", "data"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(features.technical_terms, expected);
        assert!(features.term_categories.contains(&TermCategory::Programming));
        assert!(features.term_categories.contains(&TermCategory::DataAnalysis));
        assert!(!features.term_categories.contains(&TermCategory::Academic));
    }

    #[test]
    fn test_term_shared_by_two_categories_counts_once() {
        let features = PromptFeatures::extract("analysis");
        assert_eq!(features.technical_terms.len(), 1);
        assert_eq!(features.term_categories.len(), 2);
    }

    #[test]
    fn test_hint_flags() {
        let features = PromptFeatures::extract("Given this background, list items such as apples within budget.");
        assert!(features.has_context);
        assert!(features.has_examples);
        assert!(features.has_constraints);

        let features = PromptFeatures::extract("Tell me a joke");
        assert!(!features.has_context);
        assert!(!features.has_examples);
        assert!(!features.has_constraints);
    }

    #[test]
    fn test_readability_buckets() {
        // ease = 79.935 - 1.015 * avg
        assert_eq!(readability(5.0, 5), 8.0);
        assert_eq!(readability(15.0, 15), 7.0);
        assert_eq!(readability(25.0, 25), 6.0);
        assert_eq!(readability(40.0, 40), 5.0);
        let low = readability(60.0, 60);
        assert!(low > 0.0 && low < 5.0);
        assert_eq!(readability(200.0, 200), 0.0);
    }
}
