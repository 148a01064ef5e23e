//! Ollama LLM client implementation
//!
//! Non-streaming chat completions against a local or remote Ollama server.
//! A failed call is returned to the caller as is; there is no retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::debug;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::LanguageModel;
use super::types::{ChatRequest, ChatResponse, Message, TagsResponse};

/// Ollama LLM client
#[derive(Clone)]
pub struct OllamaClient {
    http_client: HttpClient,
    config: LlmConfig,
}

impl std::fmt::Debug for OllamaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}

/// Builder for creating an OllamaClient
#[derive(Default)]
pub struct OllamaClientBuilder {
    config: Option<LlmConfig>,
    base_url: Option<String>,
    model: Option<String>,
}

impl OllamaClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the LLM configuration
    pub fn config(mut self, config: LlmConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Override the model tag
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Build the OllamaClient
    pub fn build(self) -> Result<OllamaClient> {
        let mut config = self.config.unwrap_or_default();
        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let mut builder = HttpClient::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().map_err(Error::NetworkError)?;

        Ok(OllamaClient {
            http_client,
            config,
        })
    }
}

impl OllamaClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        OllamaClientBuilder::new().config(config).build()
    }

    pub fn builder() -> OllamaClientBuilder {
        OllamaClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Send a full message list and return the raw chat response
    pub async fn chat(&self, messages: Vec<Message>) -> Result<ChatResponse> {
        let url = format!("{}/api/chat", self.config.base_url);
        let request = ChatRequest::new(&self.config.model, messages)
            .with_temperature(self.config.temperature);

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat request"
        );

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(Error::NetworkError)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status.as_u16(), &self.config.model, &body));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::LLMError(format!("Failed to parse response: {}", e)))?;

        debug!(
            model = %chat.model,
            prompt_tokens = chat.prompt_eval_count.unwrap_or(0),
            output_tokens = chat.eval_count.unwrap_or(0),
            "Chat response received"
        );

        Ok(chat)
    }

    /// Names of the models available on the server
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.config.base_url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(Error::NetworkError)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status.as_u16(), &self.config.model, &body));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| Error::LLMError(format!("Failed to parse model list: {}", e)))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let response = self.chat(vec![Message::user(prompt)]).await?;
        Ok(response.message.content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

fn error_for_status(status: u16, model: &str, body: &str) -> Error {
    match status {
        404 => Error::LLMError(format!(
            "Model '{}' not found. Pull it with `ollama pull {}`",
            model, model
        )),
        400 => Error::LLMError(format!("Bad request: {}", body)),
        500..=599 => Error::LLMError(format!("Server error ({}): {}", status, body)),
        _ => Error::LLMError(format!("HTTP error {}: {}", status, body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> LlmConfig {
        LlmConfig {
            base_url: "http://ollama:11434/".to_string(),
            model: "test/model".to_string(),
            temperature: 0.0,
            timeout_secs: Some(30),
        }
    }

    #[test]
    fn test_client_builder() {
        let client = OllamaClient::builder()
            .config(test_config())
            .base_url("https://example.com")
            .model("tinyllama")
            .build()
            .unwrap();

        assert_eq!(client.model_name(), "tinyllama");
        assert_eq!(client.base_url(), "https://example.com");
    }

    #[test]
    fn test_client_new_trims_base_url() {
        let client = OllamaClient::new(test_config()).unwrap();
        assert_eq!(client.base_url(), "http://ollama:11434");
        assert_eq!(client.model_name(), "test/model");
    }

    #[test]
    fn test_client_debug() {
        let client = OllamaClient::new(test_config()).unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("OllamaClient"));
        assert!(debug.contains("test/model"));
    }

    #[test]
    fn test_client_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OllamaClient>();
    }

    #[test]
    fn test_error_for_status() {
        let err = error_for_status(404, "llama3.2:3b", "");
        assert!(err.to_string().contains("ollama pull llama3.2:3b"));

        let err = error_for_status(503, "m", "overloaded");
        assert!(err.to_string().contains("overloaded"));
        assert_eq!(err.code(), "E200");
    }
}
