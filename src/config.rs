//! Configuration helpers for vision-chat
//!
//! Endpoint, key and model resolution for OpenAI-compatible servers. Explicit
//! values always win; environment variables come next; provider defaults last.

use std::env;
use std::str::FromStr;

use crate::Error;

/// Environment variable holding the endpoint base URL
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Environment variable holding the bearer token
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable holding the default model name
pub const MODEL_ENV: &str = "VISION_CHAT_MODEL";

/// Supported provider shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    VLLM,
    LMStudio,
    Ollama,
    LlamaCpp,
}

impl Provider {
    /// Get the default base URL for this provider
    pub fn default_url(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::VLLM => "http://localhost:8000/v1",
            Provider::LMStudio => "http://localhost:1234/v1",
            Provider::Ollama => "http://localhost:11434/v1",
            Provider::LlamaCpp => "http://localhost:8080/v1",
        }
    }

    /// Whether the provider rejects requests without a real API key.
    ///
    /// Local servers accept any bearer token.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Provider::OpenAI)
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAI),
            "vllm" => Ok(Provider::VLLM),
            "lmstudio" | "lm-studio" | "lm_studio" => Ok(Provider::LMStudio),
            "ollama" => Ok(Provider::Ollama),
            "llamacpp" | "llama-cpp" | "llama_cpp" | "llama.cpp" => Ok(Provider::LlamaCpp),
            other => Err(Error::invalid_input(format!("unknown provider: {}", other))),
        }
    }
}

/// Get the base URL from environment variable or provider default
///
/// Priority:
/// 1. `OPENAI_BASE_URL` environment variable
/// 2. Provider default URL (if provider is Some)
/// 3. fallback parameter
/// 4. OpenAI's public endpoint
///
/// # Examples
///
/// ```rust,no_run
/// use vision_chat::{get_base_url, Provider};
///
/// // Read from environment
/// let url = get_base_url(None, None);
///
/// // Use provider default
/// let url = get_base_url(Some(Provider::VLLM), None);
/// ```
pub fn get_base_url(provider: Option<Provider>, fallback: Option<&str>) -> String {
    resolve_base_url(env::var(BASE_URL_ENV).ok(), provider, fallback)
}

/// Get the API key from the explicit value or the `OPENAI_API_KEY` variable
///
/// Empty strings count as missing.
pub fn get_api_key(explicit: Option<&str>) -> Option<String> {
    resolve_api_key(explicit, env::var(API_KEY_ENV).ok())
}

/// Get the model name from environment variable or fallback
///
/// Priority:
/// 1. `VISION_CHAT_MODEL` environment variable (if prefer_env is true)
/// 2. fallback parameter
pub fn get_model(fallback: Option<&str>, prefer_env: bool) -> Option<String> {
    resolve_model(env::var(MODEL_ENV).ok(), fallback, prefer_env)
}

fn resolve_base_url(
    from_env: Option<String>,
    provider: Option<Provider>,
    fallback: Option<&str>,
) -> String {
    if let Some(url) = from_env.filter(|u| !u.is_empty()) {
        return url;
    }

    if let Some(p) = provider {
        return p.default_url().to_string();
    }

    fallback
        .unwrap_or(Provider::OpenAI.default_url())
        .to_string()
}

fn resolve_api_key(explicit: Option<&str>, from_env: Option<String>) -> Option<String> {
    explicit
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .or_else(|| from_env.filter(|k| !k.is_empty()))
}

fn resolve_model(
    from_env: Option<String>,
    fallback: Option<&str>,
    prefer_env: bool,
) -> Option<String> {
    if prefer_env {
        if let Some(model) = from_env.filter(|m| !m.is_empty()) {
            return Some(model);
        }
    }

    fallback.map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_default_urls() {
        assert_eq!(Provider::OpenAI.default_url(), "https://api.openai.com/v1");
        assert_eq!(Provider::VLLM.default_url(), "http://localhost:8000/v1");
        assert_eq!(Provider::LMStudio.default_url(), "http://localhost:1234/v1");
        assert_eq!(Provider::Ollama.default_url(), "http://localhost:11434/v1");
        assert_eq!(Provider::LlamaCpp.default_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::OpenAI);
        assert_eq!("vLLM".parse::<Provider>().unwrap(), Provider::VLLM);
        assert_eq!("LM-Studio".parse::<Provider>().unwrap(), Provider::LMStudio);
        assert_eq!("ollama".parse::<Provider>().unwrap(), Provider::Ollama);
        assert_eq!("llama.cpp".parse::<Provider>().unwrap(), Provider::LlamaCpp);
        assert!(matches!(
            "unknown".parse::<Provider>(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_requires_api_key() {
        assert!(Provider::OpenAI.requires_api_key());
        assert!(!Provider::VLLM.requires_api_key());
    }

    #[test]
    fn test_resolve_base_url_priority() {
        let url = resolve_base_url(
            Some("http://env:9000/v1".to_string()),
            Some(Provider::VLLM),
            Some("http://fallback/v1"),
        );
        assert_eq!(url, "http://env:9000/v1");

        let url = resolve_base_url(None, Some(Provider::VLLM), Some("http://fallback/v1"));
        assert_eq!(url, "http://localhost:8000/v1");

        let url = resolve_base_url(None, None, Some("http://custom:8080/v1"));
        assert_eq!(url, "http://custom:8080/v1");

        let url = resolve_base_url(Some(String::new()), None, None);
        assert_eq!(url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_resolve_api_key() {
        assert_eq!(
            resolve_api_key(Some("sk-explicit"), Some("sk-env".to_string())),
            Some("sk-explicit".to_string())
        );
        assert_eq!(
            resolve_api_key(None, Some("sk-env".to_string())),
            Some("sk-env".to_string())
        );
        assert_eq!(resolve_api_key(Some(""), None), None);
        assert_eq!(resolve_api_key(None, Some(String::new())), None);
    }

    #[test]
    fn test_resolve_model() {
        assert_eq!(
            resolve_model(Some("env-model".to_string()), Some("gpt-4o"), true),
            Some("env-model".to_string())
        );
        assert_eq!(
            resolve_model(Some("env-model".to_string()), Some("gpt-4o"), false),
            Some("gpt-4o".to_string())
        );
        assert_eq!(resolve_model(None, None, true), None);
    }
}
