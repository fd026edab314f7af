//! Mock completion provider for testing
//!
//! Responses are scripted in order and every prompt is recorded, so tests can
//! assert both what the pipeline sent and how many calls it made.

#![cfg(test)]

use super::errors::LLMError;
use super::traits::CompletionClient;
use super::types::CompletionOptions;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Mock completion provider for testing
#[derive(Clone)]
pub struct MockLLMProvider {
    model: String,
    script: Arc<Mutex<VecDeque<Result<String, LLMError>>>>,
    default_response: Option<String>,
    call_history: Arc<Mutex<Vec<(String, CompletionOptions)>>>,
}

impl MockLLMProvider {
    /// Create a new mock provider that answers "Mock response" once the script runs out
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            default_response: Some("Mock response".to_string()),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider that replays `responses` in order
    pub fn scripted<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::new();
        for response in responses {
            provider.push_response(response);
        }
        provider
    }

    /// Set the response used once the script is exhausted; `None` makes it an error
    pub fn with_default_response(mut self, response: Option<&str>) -> Self {
        self.default_response = response.map(str::to_string);
        self
    }

    /// Queue a response
    pub fn push_response(&self, response: impl Into<String>) {
        self.script.lock().unwrap().push_back(Ok(response.into()));
    }

    /// Queue an error
    pub fn push_error(&self, error: LLMError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.call_history.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    /// Options received so far, oldest first
    pub fn options(&self) -> Vec<CompletionOptions> {
        self.call_history.lock().unwrap().iter().map(|(_, o)| o.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.call_history.lock().unwrap().len()
    }
}

impl Default for MockLLMProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for MockLLMProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String, LLMError> {
        self.call_history.lock().unwrap().push((prompt.to_string(), options.clone()));

        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }

        match &self.default_response {
            Some(response) => Ok(response.clone()),
            None => Err(LLMError::network(format!(
                "MockLLMProvider: no response scripted for prompt (first 100 chars): {}",
                prompt.chars().take(100).collect::<String>()
            ))),
        }
    }
}
