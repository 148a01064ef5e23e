//! Language model collaborator
//!
//! The assistant hands the model one prompt and takes back its text
//! verbatim. [`OllamaClient`] implements [`LanguageModel`] over the Ollama
//! chat API.

mod client;
mod types;

use async_trait::async_trait;

use crate::error::Result;

pub use client::{OllamaClient, OllamaClientBuilder};
pub use types::{ChatRequest, ChatResponse, Message, MessageRole};

/// Text-in, text-out language model
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion for a single prompt
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model identifier, for logs and health checks
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn LanguageModel) {}
}
