//! LLM integration.
//!
//! Supports:
//! - **Gemini**: direct REST access to `generateContent` via reqwest
//! - **Unavailable**: offline stand-in whose calls always fail, so every
//!   remote feature falls back to its local text
//!
//! Everything above this module talks to the `LlmProvider` trait only.

pub mod gemini;
pub mod provider;

pub use gemini::GeminiProvider;
pub use provider::*;

use std::sync::Arc;
use std::time::Duration;

use crate::error::LlmError;

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Gemini,
    Unavailable,
}

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub api_key: Option<secrecy::SecretString>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match config.backend {
        LlmBackend::Gemini => create_gemini_provider(config),
        LlmBackend::Unavailable => {
            tracing::info!("LLM disabled, remote help and summaries will use local fallbacks");
            Ok(Arc::new(UnavailableProvider::new(&config.model)))
        }
    }
}

fn create_gemini_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let api_key = config
        .api_key
        .clone()
        .ok_or_else(|| LlmError::NotConfigured {
            provider: "gemini".to_string(),
        })?;

    let provider = GeminiProvider::new(
        api_key,
        &config.model,
        &config.base_url,
        config.timeout,
    )?;
    tracing::info!("Using Gemini (model: {})", config.model);
    Ok(Arc::new(provider))
}
