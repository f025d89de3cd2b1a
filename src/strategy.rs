//! Optimization strategy catalog and selection

use crate::prompt_optimizer::OptimizationType::{Analysis, Code, General, Writing};
use crate::prompt_optimizer::{OptimizationContext, OptimizationType};
use crate::quality::{QualityCriterion, QualityReport};
use serde::Serialize;

/// Criteria scoring below this trigger their general strategy
pub const STRATEGY_THRESHOLD: f64 = 7.0;

/// A named rewrite action; lower priority values are applied first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizationStrategy {
    pub name: &'static str,
    pub description: &'static str,
    pub priority: u8,
    pub applicable_types: &'static [OptimizationType],
}

impl OptimizationStrategy {
    pub fn applies_to(&self, optimization_type: OptimizationType) -> bool {
        self.applicable_types.contains(&optimization_type)
    }
}

pub static CATALOG: [OptimizationStrategy; 6] = [
    OptimizationStrategy {
        name: "improve_clarity",
        description: "Improve instruction clarity",
        priority: 1,
        applicable_types: &[General, Code, Writing, Analysis],
    },
    OptimizationStrategy {
        name: "add_structure",
        description: "Add logical structure",
        priority: 2,
        applicable_types: &[General, Writing, Analysis],
    },
    OptimizationStrategy {
        name: "add_context",
        description: "Add context information",
        priority: 3,
        applicable_types: &[General, Code, Writing, Analysis],
    },
    OptimizationStrategy {
        name: "add_code_specifics",
        description: "Add programming-specific requirements",
        priority: 1,
        applicable_types: &[Code],
    },
    OptimizationStrategy {
        name: "add_writing_guidelines",
        description: "Add writing guidelines",
        priority: 1,
        applicable_types: &[Writing],
    },
    OptimizationStrategy {
        name: "add_analysis_framework",
        description: "Add an analysis framework",
        priority: 1,
        applicable_types: &[Analysis],
    },
];

/// Each general criterion maps to exactly one catalog entry
const GENERAL_STRATEGIES: [(QualityCriterion, &str); 3] = [
    (QualityCriterion::Clarity, "improve_clarity"),
    (QualityCriterion::Structure, "add_structure"),
    (QualityCriterion::Completeness, "add_context"),
];

fn find(name: &str) -> Option<&'static OptimizationStrategy> {
    CATALOG.iter().find(|s| s.name == name)
}

/// Picks strategies for a rewrite from a baseline quality report
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategySelector;

impl StrategySelector {
    /// Ordered, deduplicated strategies for `report` under `context`.
    ///
    /// A criterion missing from the report counts as fully satisfied.
    pub fn select(
        &self,
        report: &QualityReport,
        context: &OptimizationContext,
    ) -> Vec<&'static OptimizationStrategy> {
        let mut selected: Vec<&'static OptimizationStrategy> = GENERAL_STRATEGIES
            .iter()
            .filter(|(criterion, _)| report.score(*criterion).unwrap_or(10.0) < STRATEGY_THRESHOLD)
            .filter_map(|(_, name)| find(name))
            .collect();

        let ty = context.optimization_type;
        let prefix = format!("add_{}", ty.as_str());
        selected.extend(
            CATALOG
                .iter()
                .filter(|s| s.applies_to(ty) && s.name.starts_with(&prefix)),
        );

        let mut unique: Vec<&'static OptimizationStrategy> = Vec::with_capacity(selected.len());
        for strategy in selected {
            if !unique.iter().any(|s| s.name == strategy.name) {
                unique.push(strategy);
            }
        }
        // stable, so equal priorities keep selection order
        unique.sort_by_key(|s| s.priority);
        unique
    }

    /// Every catalog entry applicable to `optimization_type`
    pub fn available(&self, optimization_type: OptimizationType) -> Vec<&'static OptimizationStrategy> {
        CATALOG.iter().filter(|s| s.applies_to(optimization_type)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::QualityScore;

    fn report(clarity: f64, structure: f64, completeness: f64) -> QualityReport {
        let mut report = QualityReport::neutral();
        for (criterion, score) in [
            (QualityCriterion::Clarity, clarity),
            (QualityCriterion::Structure, structure),
            (QualityCriterion::Completeness, completeness),
        ] {
            report
                .detailed_scores
                .insert(criterion, QualityScore::new(criterion, score, ""));
        }
        report
    }

    fn names(strategies: &[&OptimizationStrategy]) -> Vec<&'static str> {
        strategies.iter().map(|s| s.name).collect()
    }

    #[test]
    fn test_score_of_seven_selects_nothing() {
        let selected = StrategySelector.select(&report(7.0, 7.0, 7.0), &OptimizationContext::new(General));
        assert!(selected.is_empty());
    }

    #[test]
    fn test_low_scores_select_general_strategies_in_priority_order() {
        let selected = StrategySelector.select(&report(6.9, 3.0, 2.0), &OptimizationContext::new(General));
        assert_eq!(names(&selected), vec!["improve_clarity", "add_structure", "add_context"]);

        let selected = StrategySelector.select(&report(9.0, 9.0, 4.0), &OptimizationContext::new(General));
        assert_eq!(names(&selected), vec!["add_context"]);
    }

    #[test]
    fn test_type_specific_strategy_is_always_added() {
        let selected = StrategySelector.select(&report(9.0, 9.0, 9.0), &OptimizationContext::new(Code));
        assert_eq!(names(&selected), vec!["add_code_specifics"]);

        let selected = StrategySelector.select(&report(9.0, 9.0, 9.0), &OptimizationContext::new(Writing));
        assert_eq!(names(&selected), vec!["add_writing_guidelines"]);
    }

    #[test]
    fn test_stable_sort_keeps_general_before_type_specific_at_equal_priority() {
        let selected = StrategySelector.select(&report(5.0, 5.0, 5.0), &OptimizationContext::new(Analysis));
        assert_eq!(
            names(&selected),
            vec!["improve_clarity", "add_analysis_framework", "add_structure", "add_context"]
        );
    }

    #[test]
    fn test_missing_criteria_count_as_satisfied() {
        let mut empty = QualityReport::neutral();
        empty.detailed_scores.clear();
        let selected = StrategySelector.select(&empty, &OptimizationContext::new(General));
        assert!(selected.is_empty());
    }

    #[test]
    fn test_available_strategies() {
        assert_eq!(
            names(&StrategySelector.available(Code)),
            vec!["improve_clarity", "add_context", "add_code_specifics"]
        );
        assert_eq!(
            names(&StrategySelector.available(General)),
            vec!["improve_clarity", "add_structure", "add_context"]
        );
    }
}
