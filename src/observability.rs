//! Structured logging, metrics export and per-pipeline tracing context

use crate::{ClientMetrics, MetricsSnapshot};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[cfg(feature = "metrics-export")]
use prometheus::{Encoder, Gauge, IntCounter, Opts, Registry, TextEncoder};

/// Install a JSON `tracing` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Call once at process startup; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json();

    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_ok()
    {
        info!(version = env!("CARGO_PKG_VERSION"), "promptlift tracing initialized");
    }
}

/// Renders backend metrics in some text format
pub trait MetricsExporter: Send + Sync {
    fn export(&self, metrics: &ClientMetrics) -> String;

    fn name(&self) -> &str;
}

/// Monotonic snapshot fields, as (name suffix, help, accessor)
const COUNTERS: [(&str, &str, fn(&MetricsSnapshot) -> u64); 7] = [
    ("calls_total", "LLM calls made", |s| s.requests_total),
    ("calls_failed_total", "LLM calls that failed after retries", |s| s.requests_failed),
    ("retries_total", "HTTP attempts beyond the first per call", |s| s.retries),
    ("prompt_tokens_total", "Prompt tokens reported by the backend", |s| s.prompt_tokens),
    ("completion_tokens_total", "Completion tokens reported by the backend", |s| s.completion_tokens),
    ("fallbacks_total", "Unreadable replies replaced by defaults", |s| s.fallbacks),
    ("calls_successful_total", "LLM calls that returned content", |s| s.requests_successful),
];

#[cfg(feature = "metrics-export")]
pub struct PrometheusExporter {
    registry: Registry,
    counters: Vec<(IntCounter, fn(&MetricsSnapshot) -> u64)>,
    average_latency: Gauge,
}

#[cfg(feature = "metrics-export")]
impl PrometheusExporter {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("promptlift_llm".to_string()), None)?;

        let mut counters = Vec::with_capacity(COUNTERS.len());
        for (name, help, read) in COUNTERS {
            let counter = IntCounter::with_opts(Opts::new(name, help))?;
            registry.register(Box::new(counter.clone()))?;
            counters.push((counter, read));
        }

        let average_latency = Gauge::with_opts(Opts::new(
            "average_latency_ms",
            "Mean LLM call latency in milliseconds",
        ))?;
        registry.register(Box::new(average_latency.clone()))?;

        Ok(Self {
            registry,
            counters,
            average_latency,
        })
    }

    /// Advance every collector to the values in `metrics`
    pub fn update(&self, metrics: &ClientMetrics) {
        let snapshot = metrics.snapshot();
        for (counter, read) in &self.counters {
            // counters never go back; a reset source just stops advancing them
            let delta = read(&snapshot).saturating_sub(counter.get());
            counter.inc_by(delta);
        }
        self.average_latency.set(snapshot.average_latency_ms as f64);
    }
}

#[cfg(feature = "metrics-export")]
impl MetricsExporter for PrometheusExporter {
    fn export(&self, metrics: &ClientMetrics) -> String {
        self.update(metrics);

        let mut buffer = Vec::new();
        if TextEncoder::new().encode(&self.registry.gather(), &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }

    fn name(&self) -> &str {
        "prometheus"
    }
}

/// `name value` lines, one per counter, always available
pub struct TextExporter;

impl MetricsExporter for TextExporter {
    fn export(&self, metrics: &ClientMetrics) -> String {
        let snapshot = metrics.snapshot();
        let mut lines: Vec<String> = COUNTERS
            .iter()
            .map(|(name, _, read)| format!("{name} {}", read(&snapshot)))
            .collect();
        lines.push(format!("average_latency_ms {}", snapshot.average_latency_ms));
        lines.push(format!("success_rate {:.2}", snapshot.success_rate));
        lines.join("\n")
    }

    fn name(&self) -> &str {
        "text"
    }
}

/// Tracing context for one pipeline run
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub operation: &'static str,
    pub model: String,
}

impl RequestContext {
    pub fn new(operation: &'static str, model: impl Into<String>) -> Self {
        use rand::Rng;

        Self {
            request_id: format!("{:016x}", rand::thread_rng().gen::<u64>()),
            operation,
            model: model.into(),
        }
    }

    /// Span for the run; `optimization_type` is recorded once known
    pub fn span(&self) -> tracing::Span {
        tracing::span!(
            Level::INFO,
            "prompt_pipeline",
            request_id = %self.request_id,
            operation = self.operation,
            model = %self.model,
            optimization_type = tracing::field::Empty
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TokenUsage;

    fn busy_metrics() -> ClientMetrics {
        let metrics = ClientMetrics::new();
        for _ in 0..3 {
            metrics.record_attempt();
        }
        metrics.record_call(true, 100, Some(TokenUsage { prompt_tokens: 40, completion_tokens: 10 }));
        metrics.record_call(false, 200, None);
        metrics.record_fallback();
        metrics
    }

    #[test]
    fn test_text_exporter() {
        let exporter = TextExporter;
        let output = exporter.export(&busy_metrics());

        assert_eq!(exporter.name(), "text");
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines.contains(&"calls_total 2"));
        assert!(lines.contains(&"calls_failed_total 1"));
        assert!(lines.contains(&"retries_total 1"));
        assert!(lines.contains(&"prompt_tokens_total 40"));
        assert!(lines.contains(&"fallbacks_total 1"));
        assert!(lines.contains(&"average_latency_ms 150"));
        assert!(lines.contains(&"success_rate 50.00"));
    }

    #[test]
    fn test_request_ids_are_hex_and_distinct() {
        let a = RequestContext::new("optimize", "gpt-4");
        let b = RequestContext::new("optimize", "gpt-4");

        assert_eq!(a.request_id.len(), 16);
        assert!(a.request_id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing();
        init_tracing();
    }

    #[cfg(feature = "metrics-export")]
    #[test]
    fn test_prometheus_exporter() {
        let metrics = busy_metrics();
        let exporter = PrometheusExporter::new().unwrap();

        let output = exporter.export(&metrics);
        assert!(output.contains("promptlift_llm_calls_total 2"));
        assert!(output.contains("promptlift_llm_completion_tokens_total 10"));

        // exporting again must not double count
        let output = exporter.export(&metrics);
        assert!(output.contains("promptlift_llm_calls_total 2"));
    }
}
