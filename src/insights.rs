//! Rule-based strengths, weaknesses and suggestions
//!
//! Every rule checks one threshold and contributes one fixed sentence.
//! Rules are independent: any combination may fire.

use crate::features::PromptFeatures;
use crate::structure::PromptStructure;

type Predicate = fn(&PromptFeatures, &PromptStructure) -> bool;

/// A single threshold test and the sentence it contributes
pub struct Rule {
    pub message: &'static str,
    applies: Predicate,
}

impl Rule {
    pub fn applies(&self, features: &PromptFeatures, structure: &PromptStructure) -> bool {
        (self.applies)(features, structure)
    }
}

pub const ADEQUATE_LENGTH: &str = "Adequate length with enough information";
pub const HAS_EXAMPLES: &str = "Includes examples that aid understanding";
pub const HAS_CONSTRAINTS: &str = "States clear constraints";
pub const HAS_CONTEXT: &str = "Provides context information";
pub const CLEAR_GOAL: &str = "Has a clear goal";
pub const WELL_STRUCTURED: &str = "Clear and complete structure";
pub const READABLE: &str = "Good readability";

pub const TOO_SHORT: &str = "Too short, lacks information";
pub const TOO_LONG: &str = "Too long, may hurt comprehension";
pub const MISSING_EXAMPLES: &str = "Lacks examples";
pub const UNCLEAR_GOAL: &str = "Goal is not clear enough";
pub const INCOMPLETE_STRUCTURE: &str = "Structure is incomplete";
pub const POOR_READABILITY: &str = "Readability needs improvement";
pub const LONG_SENTENCES: &str = "Sentences are too long";

pub static STRENGTH_RULES: [Rule; 7] = [
    Rule { message: ADEQUATE_LENGTH, applies: |f, _| f.word_count >= 20 },
    Rule { message: HAS_EXAMPLES, applies: |f, _| f.has_examples },
    Rule { message: HAS_CONSTRAINTS, applies: |f, _| f.has_constraints },
    Rule { message: HAS_CONTEXT, applies: |f, _| f.has_context },
    Rule { message: CLEAR_GOAL, applies: |_, s| s.has_clear_goal },
    Rule { message: WELL_STRUCTURED, applies: |_, s| s.structure_score >= 7.0 },
    Rule { message: READABLE, applies: |f, _| f.readability_score >= 7.0 },
];

pub static WEAKNESS_RULES: [Rule; 7] = [
    Rule { message: TOO_SHORT, applies: |f, _| f.word_count < 10 },
    Rule { message: TOO_LONG, applies: |f, _| f.word_count > 200 },
    Rule { message: MISSING_EXAMPLES, applies: |f, _| !f.has_examples && f.word_count < 30 },
    Rule { message: UNCLEAR_GOAL, applies: |_, s| !s.has_clear_goal },
    Rule { message: INCOMPLETE_STRUCTURE, applies: |_, s| s.structure_score < 5.0 },
    Rule { message: POOR_READABILITY, applies: |f, _| f.readability_score < 5.0 },
    Rule { message: LONG_SENTENCES, applies: |f, _| f.avg_sentence_length > 25.0 },
];

pub const ADD_DETAIL: &str = "Add more details and explanation";
pub const SIMPLIFY: &str = "Simplify the wording and focus on the key points";
pub const ADD_EXAMPLES: &str = "Add concrete examples to aid understanding";
pub const SPLIT_SENTENCES: &str = "Split long sentences into shorter ones";
pub const SIMPLER_WORDS: &str = "Use simpler vocabulary and phrasing";
pub const STATE_OUTPUT: &str = "State the expected output or result explicitly";
pub const ORDER_LOGICALLY: &str = "Organize the content in a logical order";

static FEATURE_SUGGESTIONS: [Rule; 5] = [
    Rule { message: ADD_DETAIL, applies: |f, _| f.word_count < 10 },
    Rule { message: SIMPLIFY, applies: |f, _| f.word_count > 200 },
    Rule { message: ADD_EXAMPLES, applies: |f, _| !f.has_examples },
    Rule { message: SPLIT_SENTENCES, applies: |f, _| f.avg_sentence_length > 25.0 },
    Rule { message: SIMPLER_WORDS, applies: |f, _| f.readability_score < 6.0 },
];

fn fired(rules: &[Rule], features: &PromptFeatures, structure: &PromptStructure) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| rule.applies(features, structure))
        .map(|rule| rule.message.to_string())
        .collect()
}

/// Strengths and weaknesses, each in rule-table order
pub fn derive(features: &PromptFeatures, structure: &PromptStructure) -> (Vec<String>, Vec<String>) {
    (
        fired(&STRENGTH_RULES, features, structure),
        fired(&WEAKNESS_RULES, features, structure),
    )
}

/// Improvement suggestions from missing elements, features and weaknesses
pub fn suggestions(
    features: &PromptFeatures,
    structure: &PromptStructure,
    weaknesses: &[String],
) -> Vec<String> {
    let mut out: Vec<String> = structure
        .missing_elements
        .iter()
        .map(|element| format!("Consider adding {element}"))
        .collect();

    out.extend(fired(&FEATURE_SUGGESTIONS, features, structure));

    for weakness in weaknesses {
        match weakness.as_str() {
            UNCLEAR_GOAL => out.push(STATE_OUTPUT.to_string()),
            INCOMPLETE_STRUCTURE => out.push(ORDER_LOGICALLY.to_string()),
            _ => {}
        }
    }

    out
}
