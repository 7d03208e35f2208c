use super::{ChatMessage, LLMConfig, LLMProvider, LLMResponse, LLM};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const GEMINI_DEFAULT_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const OPENAI_DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Gemini `generateContent` provider
pub struct GeminiProvider {
    config: LLMConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_mime_type: &'static str,
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    total_token_count: u32,
}

impl GeminiProvider {
    pub fn new(config: LLMConfig) -> Result<Self> {
        if config.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(anyhow!("Gemini API key required"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, client })
    }

    fn build_request(&self, messages: Vec<ChatMessage>) -> GeminiRequest {
        let (system, conversation): (Vec<_>, Vec<_>) =
            messages.into_iter().partition(ChatMessage::is_system);

        let system_instruction = if system.is_empty() {
            None
        } else {
            Some(GeminiContent {
                role: None,
                parts: system
                    .into_iter()
                    .map(|msg| GeminiPart { text: msg.content })
                    .collect(),
            })
        };

        let contents = conversation
            .into_iter()
            .map(|msg| GeminiContent {
                role: Some(if msg.role == "assistant" { "model".to_string() } else { msg.role }),
                parts: vec![GeminiPart { text: msg.content }],
            })
            .collect();

        GeminiRequest {
            system_instruction,
            contents,
            generation_config: GeminiGenerationConfig {
                response_mime_type: "application/json",
                max_output_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            },
        }
    }
}

#[async_trait]
impl LLM for GeminiProvider {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow!("Gemini API key not configured"))?;

        let request = self.build_request(messages);

        let base = self
            .config
            .endpoint
            .as_deref()
            .unwrap_or(GEMINI_DEFAULT_BASE)
            .trim_end_matches('/');
        let url = format!("{}/models/{}:generateContent", base, self.config.model);

        debug!("Sending request to Gemini API ({})", self.config.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API error {}: {}", status, text));
        }

        let gemini_response: GeminiResponse = response.json().await?;

        let content = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| anyhow!("No response from Gemini"))?;

        let tokens_used = gemini_response
            .usage_metadata
            .map(|u| u.total_token_count);

        Ok(LLMResponse {
            content,
            tokens_used,
        })
    }

    fn provider_type(&self) -> LLMProvider {
        LLMProvider::Gemini
    }
}

/// OpenAI chat-completions provider, also used for local LM Studio servers
pub struct OpenAICompatibleProvider {
    config: LLMConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    response_format: OpenAIResponseFormat,
}

#[derive(Debug, Serialize)]
struct OpenAIResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    total_tokens: u32,
}

impl OpenAICompatibleProvider {
    pub fn new(config: LLMConfig) -> Result<Self> {
        if config.provider == LLMProvider::OpenAI && config.api_key.is_none() {
            return Err(anyhow!("OpenAI API key required"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl LLM for OpenAICompatibleProvider {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
        let endpoint = self
            .config
            .endpoint
            .as_deref()
            .unwrap_or(OPENAI_DEFAULT_ENDPOINT);

        let request = OpenAIRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            response_format: OpenAIResponseFormat { kind: "json_object" },
        };

        debug!("Sending request to {:?} at {}", self.config.provider, endpoint);

        let mut builder = self.client.post(endpoint).json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("{:?} API error {}: {}", self.config.provider, status, text));
        }

        let openai_response: OpenAIResponse = response.json().await?;

        let content = openai_response
            .choices
            .first()
            .ok_or_else(|| anyhow!("No response from {:?}", self.config.provider))?
            .message
            .content
            .clone();

        let tokens_used = openai_response
            .usage
            .map(|u| u.total_tokens);

        Ok(LLMResponse {
            content,
            tokens_used,
        })
    }

    fn provider_type(&self) -> LLMProvider {
        self.config.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gemini() -> GeminiProvider {
        GeminiProvider::new(LLMConfig {
            api_key: Some("test-key".to_string()),
            ..LLMConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_gemini_request_shape() {
        let request = gemini().build_request(vec![
            ChatMessage::system("Assign one category"),
            ChatMessage::user("[{\"videoId\":\"v1\",\"title\":\"t\"}]"),
        ]);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "Assign one category");
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "[{\"videoId\":\"v1\",\"title\":\"t\"}]");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert!(value["systemInstruction"].get("role").is_none());
    }

    #[test]
    fn test_gemini_request_without_system_message() {
        let request = gemini().build_request(vec![ChatMessage::user("hello")]);
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("systemInstruction").is_none());
    }

    #[test]
    fn test_gemini_response_parsing() {
        let body = r#"{
            "candidates": [{"content": {"role": "model", "parts": [{"text": "{\"v1\": \"Python\"}"}]}}],
            "usageMetadata": {"totalTokenCount": 42}
        }"#;
        let response: GeminiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.candidates[0].content.parts[0].text, "{\"v1\": \"Python\"}");
        assert_eq!(response.usage_metadata.unwrap().total_token_count, 42);
    }

    #[test]
    fn test_openai_request_asks_for_json() {
        let request = OpenAIRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::user("hi")],
            max_tokens: 100,
            temperature: 0.0,
            response_format: OpenAIResponseFormat { kind: "json_object" },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
    }
}
