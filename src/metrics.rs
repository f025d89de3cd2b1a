//! Counters for calls made to the LLM backend

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Token counts reported by the backend for one completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.prompt_tokens as u64 + self.completion_tokens as u64
    }
}

#[derive(Debug, Default)]
struct Counters {
    calls: AtomicU64,
    failures: AtomicU64,
    attempts: AtomicU64,
    latency_ms: AtomicU64,
    prompt_tokens: AtomicU64,
    completion_tokens: AtomicU64,
    fallbacks: AtomicU64,
}

/// Shared metrics for one backend.
///
/// A *call* is one `complete` invocation; an *attempt* is one HTTP round
/// trip, so `attempts - calls` is the number of retries. Clones share the
/// same counters.
#[derive(Debug, Clone, Default)]
pub struct ClientMetrics {
    counters: Arc<Counters>,
}

impl ClientMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// One HTTP round trip, retried or not
    pub fn record_attempt(&self) {
        self.counters.attempts.fetch_add(1, Ordering::Relaxed);
    }

    /// A finished call; `usage` is `None` for failures or when the backend omits it
    pub fn record_call(&self, success: bool, latency_ms: u64, usage: Option<TokenUsage>) {
        let c = &self.counters;
        c.calls.fetch_add(1, Ordering::Relaxed);
        c.latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
        if !success {
            c.failures.fetch_add(1, Ordering::Relaxed);
        }
        if let Some(usage) = usage {
            c.prompt_tokens.fetch_add(usage.prompt_tokens as u64, Ordering::Relaxed);
            c.completion_tokens.fetch_add(usage.completion_tokens as u64, Ordering::Relaxed);
        }
    }

    /// A reply that could not be read and was replaced by a default
    pub fn record_fallback(&self) {
        self.counters.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let c = &self.counters;
        let calls = c.calls.load(Ordering::Relaxed);
        let failures = c.failures.load(Ordering::Relaxed);
        let attempts = c.attempts.load(Ordering::Relaxed);
        let prompt_tokens = c.prompt_tokens.load(Ordering::Relaxed);
        let completion_tokens = c.completion_tokens.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests_total: calls,
            requests_successful: calls.saturating_sub(failures),
            requests_failed: failures,
            retries: attempts.saturating_sub(calls),
            success_rate: if calls > 0 {
                calls.saturating_sub(failures) as f64 * 100.0 / calls as f64
            } else {
                0.0
            },
            average_latency_ms: c.latency_ms.load(Ordering::Relaxed).checked_div(calls).unwrap_or(0),
            prompt_tokens,
            completion_tokens,
            total_tokens_used: prompt_tokens + completion_tokens,
            fallbacks: c.fallbacks.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        let c = &self.counters;
        for counter in [
            &c.calls,
            &c.failures,
            &c.attempts,
            &c.latency_ms,
            &c.prompt_tokens,
            &c.completion_tokens,
            &c.fallbacks,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Point-in-time copy of [`ClientMetrics`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub requests_successful: u64,
    pub requests_failed: u64,
    pub retries: u64,
    /// Percentage in 0..=100
    pub success_rate: f64,
    pub average_latency_ms: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens_used: u64,
    /// Unreadable replies that degraded to defaults
    pub fallbacks: u64,
}

impl MetricsSnapshot {
    pub fn summary(&self) -> String {
        format!(
            "Calls: {} ({:.1}% ok, {} retries), Avg Latency: {}ms, Tokens: {} in / {} out, Fallbacks: {}",
            self.requests_total,
            self.success_rate,
            self.retries,
            self.average_latency_ms,
            self.prompt_tokens,
            self.completion_tokens,
            self.fallbacks,
        )
    }
}

/// Measures one call from start to [`CallTimer::finish`]
pub struct CallTimer {
    start: Instant,
    metrics: ClientMetrics,
}

impl CallTimer {
    pub fn start(metrics: &ClientMetrics) -> Self {
        Self {
            start: Instant::now(),
            metrics: metrics.clone(),
        }
    }

    pub fn finish(self, success: bool, usage: Option<TokenUsage>) {
        let latency_ms = self.start.elapsed().as_millis() as u64;
        self.metrics.record_call(success, latency_ms, usage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(prompt_tokens: u32, completion_tokens: u32) -> Option<TokenUsage> {
        Some(TokenUsage { prompt_tokens, completion_tokens })
    }

    #[test]
    fn test_calls_and_tokens() {
        let metrics = ClientMetrics::new();
        for _ in 0..4 {
            metrics.record_attempt();
        }
        metrics.record_call(true, 100, usage(40, 10));
        metrics.record_call(true, 200, usage(60, 15));
        metrics.record_call(false, 50, None);

        let stats = metrics.snapshot();
        assert_eq!(stats.requests_total, 3);
        assert_eq!(stats.requests_successful, 2);
        assert_eq!(stats.requests_failed, 1);
        assert_eq!(stats.retries, 1);
        assert_eq!(stats.average_latency_ms, 116);
        assert_eq!(stats.prompt_tokens, 100);
        assert_eq!(stats.completion_tokens, 25);
        assert_eq!(stats.total_tokens_used, 125);
        assert!(stats.success_rate > 66.0 && stats.success_rate < 67.0);
    }

    #[test]
    fn test_empty_snapshot() {
        let stats = ClientMetrics::new().snapshot();
        assert_eq!(stats.success_rate, 0.0);
        assert_eq!(stats.average_latency_ms, 0);
        assert!(stats.summary().starts_with("Calls: 0"));
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = ClientMetrics::new();
        let timer = CallTimer::start(&metrics);
        timer.finish(true, usage(7, 3));
        metrics.clone().record_fallback();

        let stats = metrics.snapshot();
        assert_eq!(stats.requests_total, 1);
        assert_eq!(stats.total_tokens_used, 10);
        assert_eq!(stats.fallbacks, 1);

        metrics.reset();
        assert_eq!(metrics.snapshot().requests_total, 0);
        assert_eq!(metrics.snapshot().fallbacks, 0);
    }
}
