//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;
use crate::llm::{LlmBackend, LlmConfig, gemini};
use crate::onboarding::AssistantConfig;
use crate::onboarding::dispatch::DEFAULT_RECIPIENT;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Everything the onboarding binary needs at startup.
#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    pub llm: LlmConfig,
    pub assistant: AssistantConfig,
    /// WhatsApp number registrations are sent to, `+` prefix allowed.
    pub recipient: String,
    /// Launch the system browser for the dispatch link instead of printing it.
    pub open_links: bool,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                backend: LlmBackend::Unavailable,
                api_key: None,
                model: DEFAULT_MODEL.to_string(),
                base_url: gemini::DEFAULT_BASE_URL.to_string(),
                timeout: Duration::from_secs(30),
            },
            assistant: AssistantConfig::default(),
            recipient: DEFAULT_RECIPIENT.to_string(),
            open_links: false,
        }
    }
}

fn flag(value: Option<String>) -> bool {
    matches!(
        value.as_deref().map(str::trim),
        Some("1") | Some("true") | Some("yes")
    )
}

impl OnboardingConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key/value source.
    ///
    /// A Gemini key (`GEMINI_API_KEY`, else `API_KEY`) is required unless
    /// `PETANIKOPIKU_OFFLINE` is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let offline = flag(lookup("PETANIKOPIKU_OFFLINE"));
        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|k| !k.trim().is_empty());

        let backend = match (&api_key, offline) {
            (_, true) => LlmBackend::Unavailable,
            (Some(_), false) => LlmBackend::Gemini,
            (None, false) => {
                return Err(ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()));
            }
        };

        let timeout = match lookup("PETANIKOPIKU_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "PETANIKOPIKU_REQUEST_TIMEOUT_SECS".to_string(),
                    message: format!("expected whole seconds, got '{}'", raw),
                })?;
                Duration::from_secs(secs)
            }
            None => defaults.llm.timeout,
        };

        let recipient = lookup("PETANIKOPIKU_ADMIN_WA").unwrap_or(defaults.recipient);
        if recipient.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "PETANIKOPIKU_ADMIN_WA".to_string(),
                message: "recipient number is empty".to_string(),
            });
        }

        Ok(Self {
            llm: LlmConfig {
                backend,
                api_key: api_key.map(secrecy::SecretString::from),
                model: lookup("PETANIKOPIKU_MODEL").unwrap_or(defaults.llm.model),
                base_url: lookup("PETANIKOPIKU_GEMINI_BASE_URL").unwrap_or(defaults.llm.base_url),
                timeout,
            },
            assistant: defaults.assistant,
            recipient,
            open_links: flag(lookup("PETANIKOPIKU_OPEN_LINKS")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn key_selects_gemini_with_defaults() {
        let config = OnboardingConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(config.llm.backend, LlmBackend::Gemini);
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert_eq!(config.llm.base_url, gemini::DEFAULT_BASE_URL);
        assert_eq!(config.llm.timeout, Duration::from_secs(30));
        assert_eq!(config.recipient, "+6287725071919");
        assert!(!config.open_links);
    }

    #[test]
    fn api_key_fallback_variable() {
        let config = OnboardingConfig::from_lookup(lookup(&[("API_KEY", "k")])).unwrap();
        assert_eq!(config.llm.backend, LlmBackend::Gemini);
    }

    #[test]
    fn missing_key_is_an_error_unless_offline() {
        let err = OnboardingConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "GEMINI_API_KEY"));

        let config =
            OnboardingConfig::from_lookup(lookup(&[("PETANIKOPIKU_OFFLINE", "1")])).unwrap();
        assert_eq!(config.llm.backend, LlmBackend::Unavailable);
    }

    #[test]
    fn overrides_are_applied() {
        let config = OnboardingConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("PETANIKOPIKU_MODEL", "gemini-2.5-flash"),
            ("PETANIKOPIKU_GEMINI_BASE_URL", "http://127.0.0.1:8080"),
            ("PETANIKOPIKU_ADMIN_WA", "+628111"),
            ("PETANIKOPIKU_OPEN_LINKS", "true"),
            ("PETANIKOPIKU_REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.llm.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.recipient, "+628111");
        assert!(config.open_links);
        assert_eq!(config.llm.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_is_invalid_value() {
        let err = OnboardingConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("PETANIKOPIKU_REQUEST_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
