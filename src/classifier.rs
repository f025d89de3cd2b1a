//! Prompt type and complexity classification

use crate::features::PromptFeatures;
use crate::structure::PromptStructure;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic category of a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptType {
    General,
    Code,
    Writing,
    Analysis,
    Creative,
    Instruction,
    Question,
}

impl PromptType {
    pub fn as_str(self) -> &'static str {
        match self {
            PromptType::General => "general",
            PromptType::Code => "code",
            PromptType::Writing => "writing",
            PromptType::Analysis => "analysis",
            PromptType::Creative => "creative",
            PromptType::Instruction => "instruction",
            PromptType::Question => "question",
        }
    }
}

impl fmt::Display for PromptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How demanding a prompt is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    Simple,
    Medium,
    Complex,
    VeryComplex,
}

impl ComplexityLevel {
    /// Map an accumulated complexity score onto a level
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 8 => ComplexityLevel::VeryComplex,
            s if s >= 6 => ComplexityLevel::Complex,
            s if s >= 3 => ComplexityLevel::Medium,
            _ => ComplexityLevel::Simple,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComplexityLevel::Simple => "simple",
            ComplexityLevel::Medium => "medium",
            ComplexityLevel::Complex => "complex",
            ComplexityLevel::VeryComplex => "very_complex",
        }
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any of these in `technical_terms` makes a prompt a code prompt
const CODE_TERMS: [&str; 5] = ["python", "javascript", "function", "code", "api"];

const WRITING_WORDS: [&str; 5] = ["write", "article", "essay", "content", "story"];
const ANALYSIS_WORDS: [&str; 5] = ["analyze", "analysis", "data", "statistics", "evaluate"];
const CREATIVE_WORDS: [&str; 5] = ["creative", "imagine", "brainstorm", "invent", "design"];

static MULTI_TASK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(and|also|additionally|furthermore|moreover)\b").expect("valid regex")
});

/// Pick the first matching type in priority order:
/// code > writing > analysis > creative > question > instruction > general.
pub fn classify_type(text: &str, features: &PromptFeatures) -> PromptType {
    if CODE_TERMS.iter().any(|term| features.technical_terms.contains(*term)) {
        return PromptType::Code;
    }

    let lower = text.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|word| lower.contains(word));

    if mentions(&WRITING_WORDS[..]) {
        PromptType::Writing
    } else if mentions(&ANALYSIS_WORDS[..]) {
        PromptType::Analysis
    } else if mentions(&CREATIVE_WORDS[..]) {
        PromptType::Creative
    } else if features.question_count > 0 {
        PromptType::Question
    } else if features.imperative_count > 0 {
        PromptType::Instruction
    } else {
        PromptType::General
    }
}

/// Additive complexity score; each of the five contributions adds 0, 1 or 2
pub fn complexity_score(text: &str, features: &PromptFeatures, structure: &PromptStructure) -> u32 {
    let mut score = 0;

    score += match features.word_count {
        n if n > 100 => 2,
        n if n > 50 => 1,
        _ => 0,
    };

    score += match features.avg_sentence_length {
        n if n > 20.0 => 2,
        n if n > 15.0 => 1,
        _ => 0,
    };

    score += match features.technical_terms.len() {
        n if n > 5 => 2,
        n if n > 2 => 1,
        _ => 0,
    };

    score += match structure.structure_score {
        s if s > 8.0 => 2,
        s if s > 6.0 => 1,
        _ => 0,
    };

    let connectives = MULTI_TASK.find_iter(&text.to_lowercase()).count();
    score += match connectives {
        n if n > 3 => 2,
        n if n > 1 => 1,
        _ => 0,
    };

    score
}

pub fn classify_complexity(
    text: &str,
    features: &PromptFeatures,
    structure: &PromptStructure,
) -> ComplexityLevel {
    ComplexityLevel::from_score(complexity_score(text, features, structure))
}
