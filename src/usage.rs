//! Token counting and cost estimation
//!
//! Used only for reporting; nothing in the pipeline branches on these numbers.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Price in USD per 1K tokens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub input: f64,
    pub output: f64,
}

const DEFAULT_PRICING: ModelPricing = ModelPricing {
    input: 0.002,
    output: 0.002,
};

static PRICING: Lazy<HashMap<&'static str, ModelPricing>> = Lazy::new(|| {
    HashMap::from([
        ("gpt-3.5-turbo", ModelPricing { input: 0.0015, output: 0.002 }),
        ("gpt-4", ModelPricing { input: 0.03, output: 0.06 }),
        ("gpt-4-turbo", ModelPricing { input: 0.01, output: 0.03 }),
        ("Qwen/Qwen2.5-7B-Instruct", ModelPricing { input: 0.0007, output: 0.0007 }),
        ("Qwen/Qwen2.5-14B-Instruct", ModelPricing { input: 0.0014, output: 0.0014 }),
        ("Qwen/Qwen2.5-32B-Instruct", ModelPricing { input: 0.0021, output: 0.0021 }),
        ("Qwen/Qwen2.5-72B-Instruct", ModelPricing { input: 0.0056, output: 0.0056 }),
    ])
});

/// Look up the price table entry for `model`, falling back to a flat default
pub fn pricing_for(model: &str) -> ModelPricing {
    PRICING.get(model).copied().unwrap_or(DEFAULT_PRICING)
}

/// Rough token estimate: one token per four characters
pub fn count_tokens(text: &str) -> usize {
    text.chars().count() / 4
}

/// Token usage of one optimization run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
    pub cost_estimate: f64,
}

/// Resolves a model's pricing once and estimates per-call usage
#[derive(Debug, Clone)]
pub struct UsageEstimator {
    model: String,
    pricing: ModelPricing,
}

impl UsageEstimator {
    pub fn new(model: impl Into<String>) -> Self {
        let model = model.into();
        let pricing = pricing_for(&model);
        Self { model, pricing }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn count_tokens(&self, text: &str) -> usize {
        count_tokens(text)
    }

    /// Estimated cost in USD
    pub fn estimate_cost(&self, prompt_tokens: usize, completion_tokens: usize) -> f64 {
        let input_cost = (prompt_tokens as f64 / 1000.0) * self.pricing.input;
        let output_cost = (completion_tokens as f64 / 1000.0) * self.pricing.output;
        input_cost + output_cost
    }

    /// Usage for a request made of `prompt_parts` that produced `completion`
    pub fn measure<'a>(
        &self,
        prompt_parts: impl IntoIterator<Item = &'a str>,
        completion: &str,
    ) -> UsageStats {
        let prompt_tokens: usize = prompt_parts.into_iter().map(count_tokens).sum();
        let completion_tokens = count_tokens(completion);
        UsageStats {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
            cost_estimate: self.estimate_cost(prompt_tokens, completion_tokens),
        }
    }
}
