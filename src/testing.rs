//! Scripted `AiClient` used by unit tests

use crate::{AiClient, ClientError, ClientMetrics, Message};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub temperature: f32,
}

/// Replays queued responses in order, then answers "mock response"
pub struct ScriptedClient {
    pub responses: Arc<Mutex<VecDeque<Result<String, ClientError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    metrics: ClientMetrics,
}

impl ScriptedClient {
    pub fn new(responses: Vec<Result<String, ClientError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            calls: Arc::new(Mutex::new(Vec::new())),
            metrics: ClientMetrics::new(),
        }
    }

    pub fn replying(responses: &[&str]) -> Self {
        Self::new(responses.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiClient for ScriptedClient {
    async fn complete(&self, messages: &[Message], temperature: f32) -> Result<String, ClientError> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: messages.to_vec(),
            temperature,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("mock response".to_string()))
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn metrics(&self) -> Option<&ClientMetrics> {
        Some(&self.metrics)
    }
}
