//! Detailed, mostly offline prompt analysis
//!
//! Combines features, structure, classification and the rule-based insights.
//! An optional LLM pass adds up to three extra strengths, weaknesses and
//! suggestions; if that pass fails for any reason it adds nothing.

use crate::classifier::{classify_complexity, classify_type, ComplexityLevel, PromptType};
use crate::features::PromptFeatures;
use crate::insights;
use crate::parsing::{parse_json_object, string_list};
use crate::quality::EVALUATION_TEMPERATURE;
use crate::structure::PromptStructure;
use crate::{validate_prompt, AiClient, Message, OptimizerError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Most items taken from each list of the LLM pass
const AI_INSIGHT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub prompt_type: PromptType,
    pub complexity_level: ComplexityLevel,
    pub features: PromptFeatures,
    pub structure: PromptStructure,
    /// Deduplicated; order carries no meaning
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
    pub processing_time: f64,
}

#[derive(Debug, Default, PartialEq)]
struct AiInsights {
    strengths: Vec<String>,
    weaknesses: Vec<String>,
    suggestions: Vec<String>,
}

/// Analysis entry point; the LLM collaborator is optional
#[derive(Clone, Default)]
pub struct PromptAnalyzer {
    client: Option<Arc<dyn AiClient>>,
}

impl PromptAnalyzer {
    pub fn new(client: Option<Arc<dyn AiClient>>) -> Self {
        Self { client }
    }

    /// Analyzer that never calls an LLM
    pub fn offline() -> Self {
        Self { client: None }
    }

    /// Analyze `text`. Only invalid input is an error.
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn analyze(&self, text: &str, use_ai: bool) -> Result<AnalysisResult, OptimizerError> {
        let start = Instant::now();
        let text = validate_prompt(text)?;

        let features = PromptFeatures::extract(text);
        let structure = PromptStructure::score(text);
        let prompt_type = classify_type(text, &features);
        let complexity_level = classify_complexity(text, &features, &structure);

        let (mut strengths, mut weaknesses) = insights::derive(&features, &structure);
        let mut suggestions = insights::suggestions(&features, &structure, &weaknesses);

        if use_ai {
            if let Some(client) = &self.client {
                let extra = ai_insights(client.as_ref(), text).await;
                strengths.extend(extra.strengths);
                weaknesses.extend(extra.weaknesses);
                suggestions.extend(extra.suggestions);
            }
        }

        debug!(%prompt_type, %complexity_level, "analysis finished");

        Ok(AnalysisResult {
            prompt_type,
            complexity_level,
            features,
            structure,
            strengths: dedup(strengths),
            weaknesses: dedup(weaknesses),
            suggestions: dedup(suggestions),
            processing_time: start.elapsed().as_secs_f64(),
        })
    }

    /// Short human-readable digest of a result
    pub fn summary(&self, result: &AnalysisResult) -> String {
        format!(
            "Prompt analysis summary:\n\
             - Type: {}\n\
             - Complexity: {}\n\
             - Words: {}\n\
             - Structure score: {:.1}/10\n\
             - Readability: {:.1}/10\n\
             - Strengths: {}\n\
             - Weaknesses: {}\n\
             - Suggestions: {}",
            result.prompt_type,
            result.complexity_level,
            result.features.word_count,
            result.structure.structure_score,
            result.features.readability_score,
            result.strengths.len(),
            result.weaknesses.len(),
            result.suggestions.len(),
        )
    }
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

async fn ai_insights(client: &dyn AiClient, text: &str) -> AiInsights {
    let messages = [
        Message::system("You are an expert prompt analyst. Give objective, concrete analysis."),
        Message::user(format!(
            r#"Analyze the characteristics of the following prompt in depth.

Prompt: {text}

Cover:
1. Main strengths (at most 3)
2. Main weaknesses (at most 3)
3. Suggestions for improvement (at most 3)

Return JSON:
{{
    "strengths": ["strength 1", "strength 2", "strength 3"],
    "weaknesses": ["weakness 1", "weakness 2", "weakness 3"],
    "suggestions": ["suggestion 1", "suggestion 2", "suggestion 3"]
}}"#
        )),
    ];

    let reply = match client.complete(&messages, EVALUATION_TEMPERATURE).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "deep analysis call failed, skipping");
            return AiInsights::default();
        }
    };

    let Some(map) = parse_json_object(&reply) else {
        warn!("unreadable deep analysis reply, skipping");
        if let Some(metrics) = client.metrics() {
            metrics.record_fallback();
        }
        return AiInsights::default();
    };

    let take = |key: &str| {
        let mut items = string_list(&map, key);
        items.truncate(AI_INSIGHT_LIMIT);
        items
    };

    AiInsights {
        strengths: take("strengths"),
        weaknesses: take("weaknesses"),
        suggestions: take("suggestions"),
    }
}
