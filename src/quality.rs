//! LLM-graded prompt quality
//!
//! The evaluator sends a fixed rubric to the LLM at a low temperature and
//! reads back a JSON verdict. An unreadable verdict degrades to a neutral
//! report; an unreachable LLM is reported as an error.

use crate::parsing::{parse_json_object, score_value, string_list};
use crate::{validate_prompt, AiClient, Message, OptimizerError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Evaluation calls favor repeatable verdicts
pub const EVALUATION_TEMPERATURE: f32 = 0.3;

/// Score assumed when the LLM verdict cannot be read
pub const NEUTRAL_SCORE: f64 = 5.0;

/// Criteria below this get an improvement plan
const IMPROVEMENT_THRESHOLD: f64 = 7.0;
const TARGET_SCORE: f64 = 8.0;

/// One of the five rubric dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityCriterion {
    Clarity,
    Completeness,
    Structure,
    Specificity,
    Actionability,
}

impl QualityCriterion {
    pub const ALL: [QualityCriterion; 5] = [
        QualityCriterion::Clarity,
        QualityCriterion::Completeness,
        QualityCriterion::Structure,
        QualityCriterion::Specificity,
        QualityCriterion::Actionability,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QualityCriterion::Clarity => "clarity",
            QualityCriterion::Completeness => "completeness",
            QualityCriterion::Structure => "structure",
            QualityCriterion::Specificity => "specificity",
            QualityCriterion::Actionability => "actionability",
        }
    }

    /// The question the rubric asks for this criterion
    pub fn description(self) -> &'static str {
        match self {
            QualityCriterion::Clarity => "Are the instructions clear and unambiguous?",
            QualityCriterion::Completeness => "Does it include the necessary information and context?",
            QualityCriterion::Structure => "Is the logical structure clear and orderly?",
            QualityCriterion::Specificity => "Is it specific and detailed enough?",
            QualityCriterion::Actionability => "Can an AI carry out the instructions effectively?",
        }
    }

    fn tips(self) -> [&'static str; 3] {
        match self {
            QualityCriterion::Clarity => [
                "Use more precise verbs and nouns",
                "Avoid vague or ambiguous wording",
                "Break complex instructions into simple steps",
            ],
            QualityCriterion::Completeness => [
                "Add the necessary background information",
                "Describe the expected output format",
                "Include the relevant constraints",
            ],
            QualityCriterion::Structure => [
                "Organize the content with numbering or markers",
                "Order the instructions logically",
                "Separate distinct parts into paragraphs",
            ],
            QualityCriterion::Specificity => [
                "Provide concrete examples",
                "State quantities, deadlines and other specifics",
                "Describe the steps in detail",
            ],
            QualityCriterion::Actionability => [
                "Make sure every instruction can be acted on",
                "Give the AI enough information to execute",
                "Avoid overly abstract requests",
            ],
        }
    }
}

impl fmt::Display for QualityCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityCriterion {
    type Err = OptimizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QualityCriterion::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| OptimizerError::invalid_input(format!("unknown quality criterion: {s}")))
    }
}

/// Score for a single criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    pub criterion: QualityCriterion,
    pub score: f64,
    pub max_score: f64,
    pub description: String,
}

impl QualityScore {
    pub fn new(criterion: QualityCriterion, score: f64, description: impl Into<String>) -> Self {
        Self {
            criterion,
            score,
            max_score: 10.0,
            description: description.into(),
        }
    }

    pub fn percentage(&self) -> f64 {
        self.score * 100.0 / self.max_score
    }
}

/// Letter-style label derived from an overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    Pass,
    NeedsImprovement,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 9.0 => Grade::Excellent,
            s if s >= 8.0 => Grade::Good,
            s if s >= 7.0 => Grade::Fair,
            s if s >= 6.0 => Grade::Pass,
            _ => Grade::NeedsImprovement,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::Excellent => "excellent",
            Grade::Good => "good",
            Grade::Fair => "fair",
            Grade::Pass => "pass",
            Grade::NeedsImprovement => "needs improvement",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full verdict on one prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub overall_score: f64,
    pub detailed_scores: BTreeMap<QualityCriterion, QualityScore>,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub strengths: Vec<String>,
    /// Seconds spent producing the report
    pub processing_time: f64,
}

impl QualityReport {
    /// Neutral report used when the LLM verdict cannot be read
    pub fn neutral() -> Self {
        let detailed_scores = QualityCriterion::ALL
            .into_iter()
            .map(|c| (c, QualityScore::new(c, NEUTRAL_SCORE, c.description())))
            .collect();
        Self {
            overall_score: NEUTRAL_SCORE,
            detailed_scores,
            issues: vec!["Could not parse the evaluation result".to_string()],
            suggestions: vec!["Submit the prompt for evaluation again".to_string()],
            strengths: Vec::new(),
            processing_time: 0.0,
        }
    }

    pub fn grade(&self) -> Grade {
        Grade::from_score(self.overall_score)
    }

    pub fn score(&self, criterion: QualityCriterion) -> Option<f64> {
        self.detailed_scores.get(&criterion).map(|s| s.score)
    }
}

/// Depth of an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Full five-criterion rubric
    #[default]
    Comprehensive,
    /// One overall score, copied to every criterion
    Quick,
}

impl EvaluationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            EvaluationMode::Comprehensive => "comprehensive",
            EvaluationMode::Quick => "quick",
        }
    }
}

impl FromStr for EvaluationMode {
    type Err = OptimizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "comprehensive" => Ok(EvaluationMode::Comprehensive),
            "quick" => Ok(EvaluationMode::Quick),
            other => Err(OptimizerError::invalid_input(format!("unsupported evaluation mode: {other}"))),
        }
    }
}

/// Verdict of a before/after comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    SignificantImprovement,
    ClearImprovement,
    SlightImprovement,
    Comparable,
    Regression,
}

impl Recommendation {
    /// Classify an overall score delta (after minus before)
    pub fn from_delta(delta: f64) -> Self {
        match delta {
            d if d >= 2.0 => Recommendation::SignificantImprovement,
            d if d >= 1.0 => Recommendation::ClearImprovement,
            d if d >= 0.5 => Recommendation::SlightImprovement,
            d if d >= -0.5 => Recommendation::Comparable,
            _ => Recommendation::Regression,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Recommendation::SignificantImprovement => {
                "Significant improvement: the optimized version is much better, adopt it"
            }
            Recommendation::ClearImprovement => {
                "Clear improvement: the optimization worked, adopt the optimized version"
            }
            Recommendation::SlightImprovement => {
                "Slight improvement: the optimization helped a little, consider adopting it"
            }
            Recommendation::Comparable => {
                "Comparable: both versions are of similar quality, choose on other grounds"
            }
            Recommendation::Regression => {
                "Quality dropped: consider keeping the original or optimizing further"
            }
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionDelta {
    pub before: f64,
    pub after: f64,
    pub improvement: f64,
    pub improvement_percentage: f64,
}

/// Side-by-side evaluation of two prompts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptComparison {
    pub overall_improvement: f64,
    pub overall_improvement_percentage: f64,
    /// Only criteria scored in both reports
    pub detailed_comparison: BTreeMap<QualityCriterion, CriterionDelta>,
    pub report_before: QualityReport,
    pub report_after: QualityReport,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
}

/// Improvement plan for one weak criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionSuggestion {
    pub criterion: QualityCriterion,
    pub current_score: f64,
    pub target_score: f64,
    pub priority: Priority,
    pub suggestions: Vec<String>,
}

/// Grades prompts against the rubric through an [`AiClient`]
#[derive(Clone)]
pub struct QualityEvaluator {
    client: Arc<dyn AiClient>,
}

impl QualityEvaluator {
    pub fn new(client: Arc<dyn AiClient>) -> Self {
        Self { client }
    }

    /// Grade `text`.
    ///
    /// Fails only on invalid input or when the LLM is unavailable; an
    /// unreadable verdict produces [`QualityReport::neutral`].
    pub async fn evaluate(&self, text: &str, mode: EvaluationMode) -> Result<QualityReport, OptimizerError> {
        let text = validate_prompt(text)?;
        self.evaluate_text(text, mode).await
    }

    /// Grade text that did not come from a caller, such as an LLM rewrite
    #[instrument(skip(self, text, mode), fields(mode = mode.as_str(), chars = text.len()))]
    pub(crate) async fn evaluate_text(
        &self,
        text: &str,
        mode: EvaluationMode,
    ) -> Result<QualityReport, OptimizerError> {
        let start = Instant::now();

        let messages = match mode {
            EvaluationMode::Comprehensive => vec![
                Message::system(
                    "You are an expert in evaluating prompt quality. Respond strictly in JSON \
                     and keep your scores objective.",
                ),
                Message::user(comprehensive_rubric(text)),
            ],
            EvaluationMode::Quick => vec![
                Message::system("You are an expert in evaluating prompt quality. Respond quickly, in JSON."),
                Message::user(quick_rubric(text)),
            ],
        };

        let reply = self.client.complete(&messages, EVALUATION_TEMPERATURE).await?;
        let mut report = report_from_reply(&reply, mode).unwrap_or_else(|| {
            warn!(mode = mode.as_str(), "unreadable evaluation verdict, using neutral report");
            self.note_fallback();
            QualityReport::neutral()
        });
        report.processing_time = start.elapsed().as_secs_f64();

        debug!(overall = report.overall_score, "evaluation finished");
        Ok(report)
    }

    /// Grade `text` on a single criterion; an unreadable verdict scores 5
    pub async fn evaluate_by_criterion(
        &self,
        text: &str,
        criterion: QualityCriterion,
    ) -> Result<QualityScore, OptimizerError> {
        let text = validate_prompt(text)?;

        let messages = [
            Message::system(
                "You are an expert in evaluating prompt quality. Focus on the requested dimension only.",
            ),
            Message::user(criterion_rubric(text, criterion)),
        ];
        let reply = self.client.complete(&messages, EVALUATION_TEMPERATURE).await?;

        let verdict = parse_json_object(&reply);
        if verdict.is_none() {
            warn!(%criterion, "unreadable criterion verdict, using neutral score");
            self.note_fallback();
        }
        let score = verdict
            .as_ref()
            .and_then(|map| map.get("score"))
            .and_then(score_value)
            .unwrap_or(NEUTRAL_SCORE);
        let description = verdict
            .as_ref()
            .and_then(|map| map.get("reasoning"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| criterion.description().to_string());

        Ok(QualityScore::new(criterion, score, description))
    }

    /// Evaluate both prompts concurrently and compare the verdicts
    pub async fn compare_prompts(&self, before: &str, after: &str) -> Result<PromptComparison, OptimizerError> {
        let before = validate_prompt(before)?;
        let after = validate_prompt(after)?;

        let (report_before, report_after) = futures::try_join!(
            self.evaluate_text(before, EvaluationMode::Comprehensive),
            self.evaluate_text(after, EvaluationMode::Comprehensive),
        )?;

        Ok(compare_reports(report_before, report_after))
    }

    /// Plans for every criterion scoring below 7
    pub async fn improvement_suggestions(&self, text: &str) -> Result<Vec<CriterionSuggestion>, OptimizerError> {
        let report = self.evaluate(text, EvaluationMode::Comprehensive).await?;
        Ok(criterion_suggestions(&report))
    }

    fn note_fallback(&self) {
        if let Some(metrics) = self.client.metrics() {
            metrics.record_fallback();
        }
    }
}

pub fn compare_reports(report_before: QualityReport, report_after: QualityReport) -> PromptComparison {
    let overall_improvement = report_after.overall_score - report_before.overall_score;

    let detailed_comparison = report_before
        .detailed_scores
        .iter()
        .filter_map(|(criterion, before)| {
            let after = report_after.detailed_scores.get(criterion)?;
            let improvement = after.score - before.score;
            Some((
                *criterion,
                CriterionDelta {
                    before: before.score,
                    after: after.score,
                    improvement,
                    improvement_percentage: improvement * 10.0,
                },
            ))
        })
        .collect();

    PromptComparison {
        overall_improvement,
        overall_improvement_percentage: overall_improvement * 10.0,
        detailed_comparison,
        report_before,
        report_after,
        recommendation: Recommendation::from_delta(overall_improvement),
    }
}

pub fn criterion_suggestions(report: &QualityReport) -> Vec<CriterionSuggestion> {
    report
        .detailed_scores
        .values()
        .filter(|s| s.score < IMPROVEMENT_THRESHOLD)
        .map(|s| CriterionSuggestion {
            criterion: s.criterion,
            current_score: s.score,
            target_score: TARGET_SCORE,
            priority: if s.score < 5.0 { Priority::High } else { Priority::Medium },
            suggestions: s.criterion.tips().iter().map(|t| t.to_string()).collect(),
        })
        .collect()
}

/// `None` when the verdict holds no JSON object
fn report_from_reply(reply: &str, mode: EvaluationMode) -> Option<QualityReport> {
    parse_json_object(reply).map(|map| report_from_json(&map, mode))
}

fn report_from_json(map: &Map<String, Value>, mode: EvaluationMode) -> QualityReport {
    let overall_score = map
        .get("overall_score")
        .and_then(score_value)
        .unwrap_or(NEUTRAL_SCORE);

    let mut detailed_scores = BTreeMap::new();
    if let Some(scores) = map.get("scores").and_then(Value::as_object) {
        for (key, value) in scores {
            let (Ok(criterion), Some(score)) = (key.parse::<QualityCriterion>(), score_value(value)) else {
                continue;
            };
            detailed_scores.insert(criterion, QualityScore::new(criterion, score, criterion.description()));
        }
    } else if mode == EvaluationMode::Quick {
        for criterion in QualityCriterion::ALL {
            detailed_scores.insert(
                criterion,
                QualityScore::new(criterion, overall_score, criterion.description()),
            );
        }
    }

    let (issues, suggestions) = match mode {
        EvaluationMode::Comprehensive => (string_list(map, "issues"), string_list(map, "suggestions")),
        EvaluationMode::Quick => (
            first_present(map, &["main_issues", "issues"]),
            first_present(map, &["quick_suggestions", "suggestions"]),
        ),
    };

    QualityReport {
        overall_score,
        detailed_scores,
        issues,
        suggestions,
        strengths: string_list(map, "strengths"),
        processing_time: 0.0,
    }
}

fn first_present(map: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find(|key| map.contains_key(**key))
        .map(|key| string_list(map, key))
        .unwrap_or_default()
}

fn comprehensive_rubric(text: &str) -> String {
    format!(
        r#"Evaluate the quality of the following prompt in full.

Prompt: {text}

Score each dimension from 1 to 10:

1. Clarity - {clarity}
2. Completeness - {completeness}
3. Structure - {structure}
4. Specificity - {specificity}
5. Actionability - {actionability}

Return the evaluation as JSON:
{{
    "scores": {{
        "clarity": 8,
        "completeness": 7,
        "structure": 6,
        "specificity": 8,
        "actionability": 9
    }},
    "overall_score": 7.6,
    "issues": ["a concrete problem", "another thing to improve"],
    "suggestions": ["a concrete improvement", "another direction"],
    "strengths": ["a notable strength", "a quality worth keeping"]
}}"#,
        clarity = QualityCriterion::Clarity.description(),
        completeness = QualityCriterion::Completeness.description(),
        structure = QualityCriterion::Structure.description(),
        specificity = QualityCriterion::Specificity.description(),
        actionability = QualityCriterion::Actionability.description(),
    )
}

fn quick_rubric(text: &str) -> String {
    format!(
        r#"Quickly rate the quality of the following prompt from 1 to 10.

Prompt: {text}

Give the overall quality and the main strengths and weaknesses.
Return JSON:
{{
    "overall_score": 7,
    "brief_analysis": "a short analysis",
    "main_issues": ["the main problem"],
    "quick_suggestions": ["a quick fix"]
}}"#
    )
}

fn criterion_rubric(text: &str, criterion: QualityCriterion) -> String {
    format!(
        r#"Evaluate the following prompt purely in terms of "{name}".

Prompt: {text}

Criterion: {description}

Give a score from 1 to 10 and briefly explain why.
Return JSON:
{{
    "score": 8,
    "reasoning": "why this score"
}}"#,
        name = criterion.as_str(),
        description = criterion.description(),
    )
}
