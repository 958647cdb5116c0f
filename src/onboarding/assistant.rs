//! Remote help and summary generation.
//!
//! Both collaborators absorb every failure: the assistant resolves to a
//! fixed apology, the composer to `None` so the caller can use the local
//! template.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::LlmError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

use super::model::RegistrationSnapshot;
use super::prompts::{
    ASSISTANT_FALLBACK, ASSISTANT_SYSTEM_INSTRUCTION, ASSISTANT_TEMPERATURE,
    SUMMARY_TEMPERATURE, assistant_prompt, summary_prompt,
};

/// Answers a seller's question about the current step.
#[async_trait]
pub trait AssistantGateway: Send + Sync {
    /// Always resolves: remote text on success, [`ASSISTANT_FALLBACK`] otherwise.
    async fn ask(&self, question: &str, context: &str) -> String;
}

/// Produces an admin-facing summary of a finished registration.
#[async_trait]
pub trait SummaryComposer: Send + Sync {
    /// `None` means "use the local template".
    async fn compose(&self, snapshot: &RegistrationSnapshot) -> Option<String>;
}

/// Tuning for the LLM-backed collaborators.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub assistant_temperature: f32,
    pub summary_temperature: f32,
    /// Output cap; `None` leaves it to the provider.
    pub max_tokens: Option<u32>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            assistant_temperature: ASSISTANT_TEMPERATURE,
            summary_temperature: SUMMARY_TEMPERATURE,
            max_tokens: None,
        }
    }
}

/// Implements both collaborators on top of an [`LlmProvider`].
pub struct LlmAssistant {
    llm: Arc<dyn LlmProvider>,
    config: AssistantConfig,
}

impl LlmAssistant {
    pub fn new(llm: Arc<dyn LlmProvider>, config: AssistantConfig) -> Self {
        Self { llm, config }
    }

    fn request(&self, messages: Vec<ChatMessage>, temperature: f32) -> CompletionRequest {
        let request = CompletionRequest::new(messages).with_temperature(temperature);
        match self.config.max_tokens {
            Some(max) => request.with_max_tokens(max),
            None => request,
        }
    }

    async fn try_ask(&self, question: &str, context: &str) -> Result<String, LlmError> {
        let request = self.request(
            vec![
                ChatMessage::system(ASSISTANT_SYSTEM_INSTRUCTION),
                ChatMessage::user(assistant_prompt(question, context)),
            ],
            self.config.assistant_temperature,
        );
        let response = self.llm.complete(request).await?;
        Ok(response.content)
    }

    async fn try_compose(&self, snapshot: &RegistrationSnapshot) -> Result<String, LlmError> {
        let prompt = summary_prompt(snapshot)?;
        let request = self.request(
            vec![ChatMessage::user(prompt)],
            self.config.summary_temperature,
        );
        let response = self.llm.complete(request).await?;
        Ok(response.content)
    }
}

#[async_trait]
impl AssistantGateway for LlmAssistant {
    async fn ask(&self, question: &str, context: &str) -> String {
        match self.try_ask(question, context).await {
            Ok(text) => {
                info!(model = self.llm.model_name(), "Assistant answered");
                text
            }
            Err(e) => {
                warn!("Assistant request failed: {}", e);
                ASSISTANT_FALLBACK.to_string()
            }
        }
    }
}

#[async_trait]
impl SummaryComposer for LlmAssistant {
    async fn compose(&self, snapshot: &RegistrationSnapshot) -> Option<String> {
        match self.try_compose(snapshot).await {
            Ok(text) if !text.trim().is_empty() => {
                info!(model = self.llm.model_name(), "Summary generated");
                Some(text)
            }
            Ok(_) => {
                warn!("Summary generation returned empty text");
                None
            }
            Err(e) => {
                warn!("Summary generation failed: {}", e);
                None
            }
        }
    }
}
