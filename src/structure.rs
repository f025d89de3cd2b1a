//! Detection of the six structural elements of a well-formed prompt

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One of the structural parts a complete prompt is expected to have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralElement {
    Goal,
    Context,
    Instructions,
    Examples,
    Constraints,
    OutputFormat,
}

impl StructuralElement {
    /// Declaration order; `missing_elements` follows it
    pub const ALL: [StructuralElement; 6] = [
        StructuralElement::Goal,
        StructuralElement::Context,
        StructuralElement::Instructions,
        StructuralElement::Examples,
        StructuralElement::Constraints,
        StructuralElement::OutputFormat,
    ];

    /// Human-readable name used in reports and suggestions
    pub fn label(self) -> &'static str {
        match self {
            StructuralElement::Goal => "a clear goal",
            StructuralElement::Context => "context information",
            StructuralElement::Instructions => "specific instructions",
            StructuralElement::Examples => "examples",
            StructuralElement::Constraints => "constraints",
            StructuralElement::OutputFormat => "an output format",
        }
    }

    fn indicator(self) -> &'static Regex {
        match self {
            StructuralElement::Goal => &*GOAL,
            StructuralElement::Context => &*CONTEXT,
            StructuralElement::Instructions => &*INSTRUCTION,
            StructuralElement::Examples => &*EXAMPLE,
            StructuralElement::Constraints => &*CONSTRAINT,
            StructuralElement::OutputFormat => &*FORMAT,
        }
    }
}

static GOAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(create|write|generate|analyze|explain|describe|calculate|solve|design|build)\b")
        .expect("valid regex")
});
static CONTEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(given|assuming|in the context of|considering|based on|for)\b").expect("valid regex")
});
static INSTRUCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(please|should|must|need to|required|ensure|make sure)\b").expect("valid regex")
});
static EXAMPLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(for example|such as|like|including|instance|sample)\b").expect("valid regex")
});
static CONSTRAINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(limit|maximum|minimum|no more than|at least|within|between)\b").expect("valid regex")
});
static FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(format|structure|organize|layout|arrange|present as)\b").expect("valid regex")
});

/// Which structural elements a prompt contains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptStructure {
    pub has_clear_goal: bool,
    pub has_context: bool,
    pub has_instructions: bool,
    pub has_examples: bool,
    pub has_constraints: bool,
    pub has_output_format: bool,
    /// `count(present) / 6 * 10`
    pub structure_score: f64,
    /// Labels of absent elements, in declaration order
    pub missing_elements: Vec<String>,
}

impl PromptStructure {
    pub fn score(text: &str) -> Self {
        let lower = text.to_lowercase();
        let present = StructuralElement::ALL.map(|element| element.indicator().is_match(&lower));
        Self::from_flags(present)
    }

    /// Build from presence flags given in [`StructuralElement::ALL`] order
    pub fn from_flags(present: [bool; 6]) -> Self {
        let count = present.iter().filter(|p| **p).count();
        let missing_elements = StructuralElement::ALL
            .iter()
            .zip(present)
            .filter(|(_, found)| !found)
            .map(|(element, _)| element.label().to_string())
            .collect();

        Self {
            has_clear_goal: present[0],
            has_context: present[1],
            has_instructions: present[2],
            has_examples: present[3],
            has_constraints: present[4],
            has_output_format: present[5],
            structure_score: count as f64 / 6.0 * 10.0,
            missing_elements,
        }
    }

    pub fn contains(&self, element: StructuralElement) -> bool {
        match element {
            StructuralElement::Goal => self.has_clear_goal,
            StructuralElement::Context => self.has_context,
            StructuralElement::Instructions => self.has_instructions,
            StructuralElement::Examples => self.has_examples,
            StructuralElement::Constraints => self.has_constraints,
            StructuralElement::OutputFormat => self.has_output_format,
        }
    }
}
