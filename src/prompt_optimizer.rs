//! Prompt Optimization Engine
//!
//! [`AiPromptOptimizer`] runs the full pipeline: grade the prompt, pick
//! strategies from the weak spots, have the LLM rewrite it under a
//! type-specific template and grade the rewrite again.

use crate::observability::RequestContext;
use crate::parsing::{parse_rewrite_response, ParsedRewrite, NOTES_MARKER, PROMPT_MARKER};
use crate::quality::{EvaluationMode, QualityEvaluator, QualityReport};
use crate::strategy::{OptimizationStrategy, StrategySelector};
use crate::usage::{UsageEstimator, UsageStats};
use crate::{validate_prompt, AiClient, Message, OptimizerError, MAX_BATCH_SIZE};
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn, Instrument};

/// Rewrites favor variety over determinism
pub const REWRITE_TEMPERATURE: f32 = 0.7;

const REWRITE_SYSTEM: &str = "You are an expert prompt engineer. Help the user make prompts \
                              clearer, more complete, more specific and more effective.";

/// Which rewrite template and type-specific strategies apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationType {
    #[default]
    General,
    Code,
    Writing,
    Analysis,
}

impl OptimizationType {
    pub const ALL: [OptimizationType; 4] = [
        OptimizationType::General,
        OptimizationType::Code,
        OptimizationType::Writing,
        OptimizationType::Analysis,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OptimizationType::General => "general",
            OptimizationType::Code => "code",
            OptimizationType::Writing => "writing",
            OptimizationType::Analysis => "analysis",
        }
    }

    fn template(self) -> &'static str {
        match self {
            OptimizationType::General => GENERAL_TEMPLATE,
            OptimizationType::Code => CODE_TEMPLATE,
            OptimizationType::Writing => WRITING_TEMPLATE,
            OptimizationType::Analysis => ANALYSIS_TEMPLATE,
        }
    }
}

impl fmt::Display for OptimizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptimizationType {
    type Err = OptimizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        OptimizationType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| OptimizerError::invalid_input(format!("unknown optimization type: {tag}")))
    }
}

const GENERAL_TEMPLATE: &str = "\
Optimize the following prompt so that it is clearer, more complete and more specific.

Original prompt: {original_prompt}

Requirements:
1. Make the instructions clearer and more precise
2. Add any missing context
3. Improve the logical structure
4. Make sure an AI can understand and carry it out accurately";

const CODE_TEMPLATE: &str = "\
Optimize the following programming prompt.

Original prompt: {original_prompt}

Requirements:
1. Name the programming language and version
2. Specify the inputs and outputs in detail
3. Add concrete technical requirements
4. Provide a code example or the expected format
5. Include error handling requirements";

const WRITING_TEMPLATE: &str = "\
Optimize the following writing prompt.

Original prompt: {original_prompt}

Requirements:
1. State the genre and style
2. Name the target audience and tone
3. Describe the structure and format
4. Add a word count or length limit
5. List the specific points to cover";

const ANALYSIS_TEMPLATE: &str = "\
Optimize the following analysis prompt.

Original prompt: {original_prompt}

Requirements:
1. Define the subject and scope of the analysis
2. Specify the analytical framework and method
3. Describe the data sources and requirements
4. Define the output format and structure
5. Include evaluation criteria";

/// Per-request knobs for a rewrite
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationContext {
    pub optimization_type: OptimizationType,
    /// Free-form guidance appended to the rewrite instruction as `key: value` lines
    #[serde(default)]
    pub user_preferences: BTreeMap<String, String>,
    #[serde(default)]
    pub domain_knowledge: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
}

impl OptimizationContext {
    pub fn new(optimization_type: OptimizationType) -> Self {
        Self {
            optimization_type,
            ..Self::default()
        }
    }

    pub fn with_preference(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.user_preferences.insert(key.into(), value.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain_knowledge = Some(domain.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.target_audience = Some(audience.into());
        self
    }
}

/// One note on what a rewrite changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Improvement {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

impl Improvement {
    pub fn new(kind: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            description: description.into(),
        }
    }

    /// Marker for a batch item whose pipeline run failed
    pub fn error(description: impl Into<String>) -> Self {
        Self::new("error", description)
    }
}

/// Outcome of one optimization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub optimized_prompt: String,
    pub improvements: Vec<Improvement>,
    pub strategies_used: Vec<String>,
    pub quality_score_before: f64,
    pub quality_score_after: f64,
    /// Wall-clock seconds for the whole pipeline
    pub processing_time: f64,
    pub analysis_before: Option<QualityReport>,
    pub analysis_after: Option<QualityReport>,
    pub usage: UsageStats,
    pub optimization_type: OptimizationType,
    /// Set only by [`OptimizationResult::failed`]
    #[serde(default)]
    pub failed: bool,
}

impl OptimizationResult {
    /// Placeholder for a batch item that failed: zero scores and an error note
    pub fn failed(prompt: &str, optimization_type: OptimizationType, err: &OptimizerError) -> Self {
        Self {
            optimized_prompt: prompt.to_string(),
            improvements: vec![Improvement::error(format!("optimization failed: {err}"))],
            strategies_used: Vec::new(),
            quality_score_before: 0.0,
            quality_score_after: 0.0,
            processing_time: 0.0,
            analysis_before: None,
            analysis_after: None,
            usage: UsageStats::default(),
            optimization_type,
            failed: true,
        }
    }

    pub fn is_error(&self) -> bool {
        self.failed
    }

    pub fn score_delta(&self) -> f64 {
        self.quality_score_after - self.quality_score_before
    }
}

/// What a rewrite would do, without making the rewrite call
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationPreview {
    pub current_analysis: QualityReport,
    pub recommended_strategies: Vec<OptimizationStrategy>,
    pub estimated_improvements: usize,
}

/// A backend that turns a prompt into a better one
#[async_trait]
pub trait PromptOptimizer: Send + Sync {
    async fn optimize(
        &self,
        text: &str,
        context: &OptimizationContext,
    ) -> Result<OptimizationResult, OptimizerError>;

    /// Returns the name/identifier of this optimizer
    fn name(&self) -> &str;
}

/// LLM-backed optimizer
pub struct AiPromptOptimizer {
    client: Arc<dyn AiClient>,
    evaluator: QualityEvaluator,
    selector: StrategySelector,
    usage: UsageEstimator,
}

impl AiPromptOptimizer {
    pub fn new(client: Arc<dyn AiClient>) -> Self {
        Self {
            evaluator: QualityEvaluator::new(client.clone()),
            selector: StrategySelector,
            usage: UsageEstimator::new(client.model()),
            client,
        }
    }

    pub fn evaluator(&self) -> &QualityEvaluator {
        &self.evaluator
    }

    /// Catalog strategies that can apply to `optimization_type`
    pub fn available_strategies(&self, optimization_type: OptimizationType) -> Vec<&'static OptimizationStrategy> {
        self.selector.available(optimization_type)
    }

    /// Grade the prompt and list the strategies a rewrite would use
    pub async fn preview(
        &self,
        text: &str,
        context: &OptimizationContext,
    ) -> Result<OptimizationPreview, OptimizerError> {
        let text = validate_prompt(text)?;
        let current_analysis = self.evaluator.evaluate_text(text, EvaluationMode::Comprehensive).await?;
        let recommended_strategies: Vec<OptimizationStrategy> = self
            .selector
            .select(&current_analysis, context)
            .into_iter()
            .cloned()
            .collect();

        Ok(OptimizationPreview {
            estimated_improvements: recommended_strategies.len(),
            current_analysis,
            recommended_strategies,
        })
    }

    /// The evaluator's suggestions for the prompt as it stands
    pub async fn suggestions(&self, text: &str) -> Result<Vec<String>, OptimizerError> {
        let report = self.evaluator.evaluate(text, EvaluationMode::Comprehensive).await?;
        Ok(report.suggestions)
    }

    async fn run(&self, text: &str, context: &OptimizationContext) -> Result<OptimizationResult, OptimizerError> {
        let start = Instant::now();
        let text = validate_prompt(text)?;

        let before = self.evaluator.evaluate_text(text, EvaluationMode::Comprehensive).await?;
        let strategies = self.selector.select(&before, context);
        debug!(
            baseline = before.overall_score,
            strategies = ?strategies.iter().map(|s| s.name).collect::<Vec<_>>(),
            "strategies selected"
        );

        let messages = [
            Message::system(REWRITE_SYSTEM),
            Message::user(build_instruction(text, &strategies, context)),
        ];
        let reply = self.client.complete(&messages, REWRITE_TEMPERATURE).await?;

        let ParsedRewrite {
            mut optimized_prompt,
            improvements,
        } = parse_rewrite_response(&reply);
        if optimized_prompt.is_empty() {
            optimized_prompt = text.to_string();
        }

        // the rewrite is LLM output, so it skips caller input validation
        let after = self
            .evaluator
            .evaluate_text(&optimized_prompt, EvaluationMode::Comprehensive)
            .await?;

        let usage = self
            .usage
            .measure(messages.iter().map(|m| m.content.as_str()), &reply);

        info!(
            before = before.overall_score,
            after = after.overall_score,
            strategies = strategies.len(),
            tokens = usage.total_tokens,
            "prompt optimized"
        );

        Ok(OptimizationResult {
            optimized_prompt,
            improvements,
            strategies_used: strategies.iter().map(|s| s.name.to_string()).collect(),
            quality_score_before: before.overall_score,
            quality_score_after: after.overall_score,
            processing_time: start.elapsed().as_secs_f64(),
            analysis_before: Some(before),
            analysis_after: Some(after),
            usage,
            optimization_type: context.optimization_type,
            failed: false,
        })
    }
}

#[async_trait]
impl PromptOptimizer for AiPromptOptimizer {
    async fn optimize(
        &self,
        text: &str,
        context: &OptimizationContext,
    ) -> Result<OptimizationResult, OptimizerError> {
        let request = RequestContext::new("optimize", self.client.model());
        let span = request.span();
        span.record("optimization_type", context.optimization_type.as_str());
        self.run(text, context).instrument(span).await
    }

    fn name(&self) -> &str {
        "ai"
    }
}

/// Assemble the rewrite instruction sent to the LLM
pub fn build_instruction(
    text: &str,
    strategies: &[&OptimizationStrategy],
    context: &OptimizationContext,
) -> String {
    let mut instruction = context
        .optimization_type
        .template()
        .replace("{original_prompt}", text);

    if !strategies.is_empty() {
        instruction.push_str("\n\nPay particular attention to these optimization strategies:\n");
        for strategy in strategies {
            instruction.push_str(&format!("- {}\n", strategy.description));
        }
    }

    if !context.user_preferences.is_empty() {
        instruction.push_str("\n\nUser preferences:\n");
        for (key, value) in &context.user_preferences {
            instruction.push_str(&format!("- {key}: {value}\n"));
        }
    }

    if let Some(domain) = &context.domain_knowledge {
        instruction.push_str(&format!("\n\nDomain knowledge: {domain}"));
    }
    if let Some(audience) = &context.target_audience {
        instruction.push_str(&format!("\n\nTarget audience: {audience}"));
    }

    instruction.push_str(&format!(
        "\n\nReply in exactly this format:\n\n\
         {PROMPT_MARKER}:\n<the optimized prompt>\n\n\
         {NOTES_MARKER}:\n1. <kind of change>: <what was changed and why>\n\
         2. <kind of change>: <what was changed and why>"
    ));

    instruction
}

/// Optimize up to [`MAX_BATCH_SIZE`] prompts concurrently.
///
/// Items fail independently: a failed run becomes an
/// [`OptimizationResult::failed`] entry at the same position and the other
/// items are unaffected. Only an invalid batch size is an error.
pub async fn batch_optimize<O, S>(
    optimizer: &O,
    prompts: &[S],
    context: &OptimizationContext,
) -> Result<Vec<OptimizationResult>, OptimizerError>
where
    O: PromptOptimizer + ?Sized,
    S: AsRef<str>,
{
    if prompts.is_empty() {
        return Err(OptimizerError::invalid_input("batch must contain at least one prompt"));
    }
    if prompts.len() > MAX_BATCH_SIZE {
        return Err(OptimizerError::invalid_input(format!(
            "batch holds {} prompts, the limit is {}",
            prompts.len(),
            MAX_BATCH_SIZE
        )));
    }

    let runs = prompts.iter().map(|p| optimizer.optimize(p.as_ref(), context));
    let outcomes = join_all(runs).await;

    Ok(outcomes
        .into_iter()
        .zip(prompts)
        .enumerate()
        .map(|(index, (outcome, prompt))| {
            outcome.unwrap_or_else(|err| {
                warn!(index, optimizer = optimizer.name(), error = %err, "batch item failed");
                OptimizationResult::failed(prompt.as_ref(), context.optimization_type, &err)
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedClient;
    use crate::ClientError;

    const WEAK_CLARITY: &str = r#"{"scores": {"clarity": 5, "completeness": 8, "structure": 8, "specificity": 6, "actionability": 7}, "overall_score": 6.2, "issues": ["vague"], "suggestions": ["name the language"]}"#;
    const STRONG: &str = r#"{"scores": {"clarity": 9, "completeness": 9, "structure": 8, "specificity": 8, "actionability": 9}, "overall_score": 8.6}"#;
    const REWRITE: &str = "Optimized Prompt:\nWrite a Python function that sorts a list of integers in ascending order.\n\nImprovement Notes:\n1. Clarity: named the language\n2. Specificity: stated the sort order";

    fn optimizer(responses: Vec<Result<String, ClientError>>) -> (Arc<ScriptedClient>, AiPromptOptimizer) {
        let client = Arc::new(ScriptedClient::new(responses));
        (client.clone(), AiPromptOptimizer::new(client))
    }

    fn ok(s: &str) -> Result<String, ClientError> {
        Ok(s.to_string())
    }

    #[tokio::test]
    async fn test_optimize_full_pipeline() {
        let (client, optimizer) = optimizer(vec![ok(WEAK_CLARITY), ok(REWRITE), ok(STRONG)]);
        let context = OptimizationContext::new(OptimizationType::Code);

        let result = optimizer.optimize("sort numbers", &context).await.unwrap();

        assert_eq!(
            result.optimized_prompt,
            "Write a Python function that sorts a list of integers in ascending order."
        );
        assert_eq!(result.improvements.len(), 2);
        assert_eq!(result.improvements[0], Improvement::new("Clarity", "named the language"));
        assert_eq!(result.strategies_used, vec!["improve_clarity", "add_code_specifics"]);
        assert_eq!(result.quality_score_before, 6.2);
        assert_eq!(result.quality_score_after, 8.6);
        assert!(result.score_delta() > 2.0);
        assert_eq!(result.optimization_type, OptimizationType::Code);
        assert!(result.analysis_before.is_some());
        assert!(result.usage.total_tokens > 0);
        assert!(!result.is_error());

        let calls = client.calls();
        let temperatures: Vec<f32> = calls.iter().map(|c| c.temperature).collect();
        assert_eq!(temperatures, vec![0.3, REWRITE_TEMPERATURE, 0.3]);

        let instruction = &calls[1].messages[1].content;
        assert!(instruction.contains("Original prompt: sort numbers"));
        assert!(instruction.contains("- Improve instruction clarity"));
        assert!(instruction.contains("- Add programming-specific requirements"));
        assert!(calls[2].messages[1].content.contains("sorts a list of integers"));
    }

    #[tokio::test]
    async fn test_error_typed_note_does_not_mark_success_as_failed() {
        let rewrite = "Optimized Prompt:\nWrite a Python function that sorts a list of integers.\n\nImprovement Notes:\n1. error: fixed the typo in \"nubmers\"";
        let (_, optimizer) = optimizer(vec![ok(WEAK_CLARITY), ok(rewrite), ok(STRONG)]);

        let result = optimizer
            .optimize("sort nubmers", &OptimizationContext::new(OptimizationType::Code))
            .await
            .unwrap();

        assert_eq!(result.improvements, vec![Improvement::new("error", "fixed the typo in \"nubmers\"")]);
        assert!(!result.is_error());
        assert_eq!(result.quality_score_after, 8.6);
    }

    #[tokio::test]
    async fn test_optimize_without_markers_uses_raw_reply() {
        let raw = "Write a Python function that sorts numbers and returns them.";
        let (_, optimizer) = optimizer(vec![ok(STRONG), ok(raw), ok("garbage")]);

        let result = optimizer
            .optimize("sort numbers", &OptimizationContext::default())
            .await
            .unwrap();

        assert_eq!(result.optimized_prompt, raw);
        assert_eq!(result.improvements.len(), 1);
        assert!(result.strategies_used.is_empty());
        // unreadable verdict on the rewrite degrades to neutral
        assert_eq!(result.quality_score_after, 5.0);
    }

    #[tokio::test]
    async fn test_rewrite_failure_propagates() {
        let (client, optimizer) = optimizer(vec![ok(STRONG), Err(ClientError::server(503, "overloaded"))]);

        let err = optimizer
            .optimize("sort numbers", &OptimizationContext::default())
            .await
            .unwrap_err();

        assert!(matches!(err, OptimizerError::ServiceUnavailable(_)));
        assert_eq!(client.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_input_makes_no_calls() {
        let (client, optimizer) = optimizer(vec![]);
        let err = optimizer
            .optimize(" \t ", &OptimizationContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidInput { .. }));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_preview_makes_a_single_call() {
        let (client, optimizer) = optimizer(vec![ok(WEAK_CLARITY)]);
        let preview = optimizer
            .preview("sort numbers", &OptimizationContext::new(OptimizationType::Writing))
            .await
            .unwrap();

        assert_eq!(client.calls().len(), 1);
        assert_eq!(preview.estimated_improvements, 2);
        assert_eq!(preview.recommended_strategies[0].name, "improve_clarity");
        assert_eq!(preview.recommended_strategies[1].name, "add_writing_guidelines");
        assert_eq!(preview.current_analysis.overall_score, 6.2);
    }

    #[tokio::test]
    async fn test_suggestions() {
        let (_, optimizer) = optimizer(vec![ok(WEAK_CLARITY)]);
        let suggestions = optimizer.suggestions("sort numbers").await.unwrap();
        assert_eq!(suggestions, vec!["name the language"]);
    }

    #[test]
    fn test_available_strategies() {
        let (_, optimizer) = optimizer(vec![]);
        let names: Vec<_> = optimizer
            .available_strategies(OptimizationType::Writing)
            .iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(
            names,
            vec!["improve_clarity", "add_structure", "add_context", "add_writing_guidelines"]
        );
    }

    #[test]
    fn test_build_instruction() {
        let context = OptimizationContext::new(OptimizationType::Analysis)
            .with_preference("tone", "formal")
            .with_preference("length", "short")
            .with_domain("retail sales")
            .with_audience("executives");

        let instruction = build_instruction("look at sales", &[], &context);

        assert!(instruction.starts_with("Optimize the following analysis prompt."));
        assert!(instruction.contains("Original prompt: look at sales"));
        assert!(!instruction.contains("optimization strategies"));
        // preferences are emitted in key order
        let length = instruction.find("- length: short").unwrap();
        let tone = instruction.find("- tone: formal").unwrap();
        assert!(length < tone);
        assert!(instruction.contains("Domain knowledge: retail sales"));
        assert!(instruction.contains("Target audience: executives"));
        assert!(instruction.contains("Optimized Prompt:\n"));
        assert!(instruction.contains("Improvement Notes:\n"));
    }

    #[test]
    fn test_optimization_type_parsing() {
        assert_eq!("code".parse::<OptimizationType>().unwrap(), OptimizationType::Code);
        assert_eq!(" Writing ".parse::<OptimizationType>().unwrap(), OptimizationType::Writing);
        let err = "poetry".parse::<OptimizationType>().unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidInput { .. }));
    }

    #[test]
    fn test_result_serializes_improvement_type() {
        let json = serde_json::to_value(Improvement::error("boom")).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["description"], "boom");
    }

    /// Rule-only optimizer that fails on demand
    struct Shouting;

    #[async_trait]
    impl PromptOptimizer for Shouting {
        async fn optimize(
            &self,
            text: &str,
            context: &OptimizationContext,
        ) -> Result<OptimizationResult, OptimizerError> {
            if text.contains("boom") {
                return Err(ClientError::timeout("exploded").into());
            }
            Ok(OptimizationResult {
                optimized_prompt: text.to_uppercase(),
                improvements: vec![Improvement::new("volume", "louder")],
                strategies_used: vec!["shout".to_string()],
                quality_score_before: 4.0,
                quality_score_after: 6.0,
                processing_time: 0.0,
                analysis_before: None,
                analysis_after: None,
                usage: UsageStats::default(),
                optimization_type: context.optimization_type,
                failed: false,
            })
        }

        fn name(&self) -> &str {
            "shouting"
        }
    }

    #[tokio::test]
    async fn test_batch_isolates_failures() {
        let context = OptimizationContext::default();
        let results = batch_optimize(&Shouting, &["one", "boom", "three"], &context).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].optimized_prompt, "ONE");
        assert!(!results[0].is_error());
        assert!(results[1].is_error());
        assert_eq!(results[1].optimized_prompt, "boom");
        assert_eq!(results[1].quality_score_before, 0.0);
        assert_eq!(results[1].quality_score_after, 0.0);
        assert!(results[1].improvements[0].description.contains("exploded"));
        assert_eq!(results[2].optimized_prompt, "THREE");
        assert_eq!(results[2].quality_score_after, 6.0);
    }

    #[tokio::test]
    async fn test_batch_size_limits() {
        let context = OptimizationContext::default();
        let empty: [&str; 0] = [];
        assert!(batch_optimize(&Shouting, &empty, &context).await.is_err());

        let too_many = vec!["x"; MAX_BATCH_SIZE + 1];
        assert!(batch_optimize(&Shouting, &too_many, &context).await.is_err());

        let full = vec!["x"; MAX_BATCH_SIZE];
        assert_eq!(batch_optimize(&Shouting, &full, &context).await.unwrap().len(), MAX_BATCH_SIZE);
    }

    #[tokio::test]
    async fn test_batch_over_dyn_optimizer_with_unavailable_client() {
        let client = Arc::new(ScriptedClient::new(vec![
            Err(ClientError::timeout("down")),
            Err(ClientError::timeout("down")),
        ]));
        let optimizer: Box<dyn PromptOptimizer> = Box::new(AiPromptOptimizer::new(client));

        let results = batch_optimize(optimizer.as_ref(), &["a", "b"], &OptimizationContext::default())
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(OptimizationResult::is_error));
    }
}
