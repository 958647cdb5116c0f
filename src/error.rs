//! Error types for the onboarding flow.

use std::time::Duration;

/// Startup error type. Runtime failures (LLM calls, media, dispatch) are
/// recovered where they happen.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Provider {provider} is not configured")]
    NotConfigured { provider: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors converting a selected image into an embeddable preview.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Selection {file_name} is empty")]
    Empty { file_name: String },

    #[error("Selection {file_name} is not an image ({mime_type})")]
    NotAnImage { file_name: String, mime_type: String },

    #[error("Conversion of {file_name} failed: {reason}")]
    Conversion { file_name: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors opening the dispatch link.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Failed to launch {program}: {reason}")]
    LaunchFailed { program: String, reason: String },
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_errors_convert_into_error() {
        let err: Error = ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()).into();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required environment variable: GEMINI_API_KEY"
        );

        let err: Error = LlmError::NotConfigured {
            provider: "gemini".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "LLM error: Provider gemini is not configured");
    }
}
