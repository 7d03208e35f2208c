pub mod providers;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use crate::config::LLMConfig;

/// LLM provider types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LLMProvider {
    Gemini,
    OpenAI,
    LMStudio,
}

/// Chat message for LLM communication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.role == "system"
    }
}

/// LLM response
#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub tokens_used: Option<u32>,
}

/// Trait for LLM providers.
///
/// Providers are asked for JSON output: the response content is expected to be a
/// single JSON document.
#[async_trait]
pub trait LLM: Send + Sync {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse>;
    fn provider_type(&self) -> LLMProvider;
}

/// Create LLM instance based on configuration
pub fn create_llm(config: &LLMConfig) -> Result<Box<dyn LLM>> {
    match config.provider {
        LLMProvider::Gemini => Ok(Box::new(providers::GeminiProvider::new(config.clone())?)),
        LLMProvider::OpenAI | LLMProvider::LMStudio => {
            Ok(Box::new(providers::OpenAICompatibleProvider::new(config.clone())?))
        }
    }
}

/// Strip markdown code fences some models wrap JSON in
pub fn clean_llm_response(content: &str) -> String {
    let content = content.trim();

    // ```json ... ``` or ``` ... ```
    if content.starts_with("```") {
        if let Some(start) = content.find('\n') {
            if let Some(end) = content.rfind("```") {
                if end > start {
                    return content[start + 1..end].trim().to_string();
                }
            }
        }
    }

    content.replace("```", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_llm_response_with_markdown() {
        let input = "```json\n{\"vid1\": \"Python\"}\n```";
        assert_eq!(clean_llm_response(input), "{\"vid1\": \"Python\"}");
    }

    #[test]
    fn test_clean_llm_response_without_markdown() {
        let input = "{\"vid1\": [\"python\", \"loops\"]}";
        assert_eq!(clean_llm_response(input), input);
    }

    #[test]
    fn test_create_llm_requires_key_for_gemini() {
        let config = LLMConfig::default();
        assert!(create_llm(&config).is_err());

        let config = LLMConfig {
            api_key: Some("key".to_string()),
            ..LLMConfig::default()
        };
        let llm = create_llm(&config).unwrap();
        assert_eq!(llm.provider_type(), LLMProvider::Gemini);
    }

    #[test]
    fn test_lmstudio_needs_no_key() {
        let config = LLMConfig {
            provider: LLMProvider::LMStudio,
            endpoint: Some("http://localhost:1234/v1/chat/completions".to_string()),
            ..LLMConfig::default()
        };
        let llm = create_llm(&config).unwrap();
        assert_eq!(llm.provider_type(), LLMProvider::LMStudio);
    }
}
