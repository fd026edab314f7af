//! Ollama provider for local model execution
//!
//! Talks to the `/api/chat` endpoint of an Ollama server with a single user
//! message per request and streaming disabled.

use super::traits::CompletionClient;
use super::types::{CompletionOptions, Message};
use crate::llm::errors::LLMError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default local Ollama address
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default chat model
pub const DEFAULT_MODEL: &str = "llama3";

/// Connection settings for an Ollama server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL, e.g. `http://localhost:11434`
    pub endpoint: String,

    /// Model tag, e.g. `llama3`
    pub model: String,

    /// Request timeout; `None` waits for as long as the server takes
    pub timeout_secs: Option<u64>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: None,
        }
    }
}

/// Ollama provider implementation
pub struct OllamaProvider {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaProvider {
    /// Create a new Ollama provider from configuration (doesn't connect yet)
    pub fn create(config: OllamaConfig) -> Result<Self, LLMError> {
        if config.model.trim().is_empty() {
            return Err(LLMError::config("Ollama model name is empty"));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| LLMError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create provider with custom model
    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    fn build_request(&self, prompt: &str, options: &CompletionOptions) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![Message::user(prompt)],
            stream: false,
            options: ChatOptions::from(options),
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> LLMError {
        if err.is_timeout() {
            LLMError::timeout(Duration::from_secs(self.config.timeout_secs.unwrap_or_default()))
        } else {
            LLMError::from(err)
        }
    }
}

#[async_trait]
impl CompletionClient for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn is_available(&self) -> bool {
        match self.client.get(self.url("api/tags")).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String, LLMError> {
        if prompt.trim().is_empty() {
            return Err(LLMError::invalid_request("prompt is empty"));
        }

        let request = self.build_request(prompt, options);
        debug!(model = %self.config.model, prompt_chars = prompt.len(), "Sending chat request to Ollama");

        let response = self
            .client
            .post(self.url("api/chat"))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);

            if status.as_u16() == 404 && message.contains("not found") {
                return Err(LLMError::model_not_found(&self.config.model));
            }
            return Err(LLMError::api(status.as_u16(), message));
        }

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        let parsed = parse_chat_response(&body)?;
        debug!(response_chars = parsed.len(), "Received chat response from Ollama");

        Ok(parsed)
    }
}

/// Extract the assistant's text from a non-streaming `/api/chat` body
fn parse_chat_response(body: &str) -> Result<String, LLMError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    Ok(response.message.content)
}

/// Ollama chat request structure
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Default, Serialize)]
struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

impl From<&CompletionOptions> for ChatOptions {
    fn from(options: &CompletionOptions) -> Self {
        Self {
            temperature: options.temperature,
            // Clamp to i32::MAX
            num_predict: options.max_tokens.map(|n| i32::try_from(n).unwrap_or(i32::MAX)),
            top_p: options.top_p,
            stop: options.stop.clone(),
        }
    }
}

/// Ollama chat response structure
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Builder for OllamaProvider
pub struct OllamaProviderBuilder {
    config: OllamaConfig,
}

impl OllamaProviderBuilder {
    pub fn new() -> Self {
        Self { config: OllamaConfig::default() }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn timeout(mut self, timeout: u64) -> Self {
        self.config.timeout_secs = Some(timeout);
        self
    }

    pub fn build(self) -> Result<OllamaProvider, LLMError> {
        OllamaProvider::create(self.config)
    }
}

impl Default for OllamaProviderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::create(OllamaConfig::default());
        assert!(provider.is_ok());
    }

    #[test]
    fn test_empty_model_rejected() {
        let config = OllamaConfig { model: "  ".to_string(), ..OllamaConfig::default() };
        assert!(matches!(
            OllamaProvider::create(config),
            Err(LLMError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn test_builder() {
        let provider = OllamaProviderBuilder::new()
            .endpoint("http://gpu-box:11434/")
            .model("llama3.2")
            .timeout(120)
            .build()
            .unwrap();

        assert_eq!(provider.model(), "llama3.2");
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.url("api/chat"), "http://gpu-box:11434/api/chat");
        assert_eq!(provider.config().timeout_secs, Some(120));
    }

    #[test]
    fn test_request_body_is_single_user_message() {
        let provider = OllamaProvider::create(OllamaConfig::default()).unwrap();
        let options = CompletionOptions::default().with_temperature(0.2).with_max_tokens(512);
        let request = provider.build_request("What's for dinner?", &options);

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], "llama3");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "What's for dinner?");
        assert_eq!(body["options"]["num_predict"], 512);
        assert!(body["options"].get("top_p").is_none());
    }

    #[test]
    fn test_parse_chat_response() {
        let body = r#"{"model":"llama3","message":{"role":"assistant","content":"Meal Suggestion: Tacos"},"done":true}"#;
        assert_eq!(parse_chat_response(body).unwrap(), "Meal Suggestion: Tacos");

        let err = parse_chat_response(r#"{"done":true}"#).unwrap_err();
        assert!(matches!(err, LLMError::ParseError { .. }));
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected_without_network() {
        let provider = OllamaProviderBuilder::new()
            .endpoint("http://127.0.0.1:9")
            .build()
            .unwrap();
        let result = provider.complete("   ", &CompletionOptions::default()).await;
        assert!(matches!(result, Err(LLMError::InvalidRequest { .. })));
    }

    #[tokio::test]
    #[ignore] // Requires Ollama to be running
    async fn test_live_completion() {
        let provider = OllamaProvider::create(OllamaConfig::default()).unwrap();
        if provider.is_available().await {
            let reply = provider
                .complete("Name one vegetable.", &CompletionOptions::default())
                .await;
            assert!(reply.is_ok());
        }
    }
}
