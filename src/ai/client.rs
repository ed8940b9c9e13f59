//! LLM API client supporting Anthropic and OpenAI-compatible backends
//!
//! Provides a unified interface for making API calls to different LLM providers.
//! Uses ureq (sync HTTP), so no async runtime is needed.

use crate::ai::{AiError, AiResult, PromptTemplate, TextGenerator};
use crate::config::UserConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Supported LLM backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmBackend {
    #[default]
    Anthropic,
    OpenAi,
    OpenRouter,
    Ollama,
}

impl LlmBackend {
    /// Environment variable holding the API key, if the backend needs one
    pub fn env_key(&self) -> Option<&'static str> {
        match self {
            LlmBackend::Anthropic => Some("ANTHROPIC_API_KEY"),
            LlmBackend::OpenAi => Some("OPENAI_API_KEY"),
            LlmBackend::OpenRouter => Some("OPENROUTER_API_KEY"),
            LlmBackend::Ollama => None,
        }
    }

    pub fn signup_url(&self) -> &'static str {
        match self {
            LlmBackend::Anthropic => "https://console.anthropic.com/settings/keys",
            LlmBackend::OpenAi => "https://platform.openai.com/api-keys",
            LlmBackend::OpenRouter => "https://openrouter.ai/keys",
            LlmBackend::Ollama => "https://ollama.ai (no key needed, just run locally)",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmBackend::Anthropic => "claude-3-haiku-20240307",
            LlmBackend::OpenAi => "gpt-4o-mini",
            LlmBackend::OpenRouter => "anthropic/claude-3-haiku",
            LlmBackend::Ollama => "llama3.1:8b",
        }
    }

    pub fn api_url(&self) -> &'static str {
        match self {
            LlmBackend::Anthropic => "https://api.anthropic.com/v1/messages",
            LlmBackend::OpenAi => "https://api.openai.com/v1/chat/completions",
            LlmBackend::OpenRouter => "https://openrouter.ai/api/v1/chat/completions",
            LlmBackend::Ollama => "http://localhost:11434/v1/chat/completions",
        }
    }

    pub fn is_openai_compatible(&self) -> bool {
        !matches!(self, LlmBackend::Anthropic)
    }

    pub fn requires_api_key(&self) -> bool {
        self.env_key().is_some()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmBackend::Anthropic => "anthropic",
            LlmBackend::OpenAi => "openai",
            LlmBackend::OpenRouter => "openrouter",
            LlmBackend::Ollama => "ollama",
        }
    }
}

impl std::fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LlmBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(LlmBackend::Anthropic),
            "openai" | "gpt" => Ok(LlmBackend::OpenAi),
            "openrouter" => Ok(LlmBackend::OpenRouter),
            "ollama" => Ok(LlmBackend::Ollama),
            other => Err(format!(
                "Unknown backend '{}'. Valid values: anthropic, openai, openrouter, ollama",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub backend: LlmBackend,
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Overrides the backend's endpoint (used for remote Ollama servers)
    pub api_url: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::default(),
            model: None,
            max_tokens: 1024,
            temperature: 0.3,
            api_url: None,
        }
    }
}

impl AiConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.backend.default_model())
    }

    pub fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .unwrap_or_else(|| self.backend.api_url())
    }
}

/// Unified LLM client over sync HTTP via ureq
pub struct AiClient {
    config: AiConfig,
    api_key: String,
    agent: ureq::Agent,
}

fn make_agent() -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // status codes are mapped to AiError below
        .timeout_global(Some(std::time::Duration::from_secs(120)))
        .build()
        .new_agent()
}

impl AiClient {
    pub fn new(config: AiConfig, api_key: impl Into<String>) -> Self {
        Self {
            config,
            api_key: api_key.into(),
            agent: make_agent(),
        }
    }

    /// Build a client from the merged user config (env vars already applied).
    ///
    /// `backend` overrides the configured backend when given.
    pub fn from_user_config(user: &UserConfig, backend: Option<LlmBackend>) -> AiResult<Self> {
        let backend = match backend {
            Some(b) => b,
            None => user.ai_backend().parse().map_err(AiError::ConfigError)?,
        };

        let mut config = AiConfig {
            backend,
            model: user.ai_model().map(String::from),
            ..Default::default()
        };

        if !backend.requires_api_key() {
            config.api_url = Some(format!(
                "{}/v1/chat/completions",
                user.ollama_url().trim_end_matches('/')
            ));
            return Ok(Self::new(config, "ollama"));
        }

        let api_key = match backend {
            LlmBackend::Anthropic => user.anthropic_api_key(),
            LlmBackend::OpenAi => user.openai_api_key(),
            LlmBackend::OpenRouter => user.openrouter_api_key(),
            LlmBackend::Ollama => None,
        }
        .ok_or_else(|| AiError::MissingApiKey {
            env_var: backend.env_key().unwrap_or_default().to_string(),
            signup_url: backend.signup_url().to_string(),
        })?;

        Ok(Self::new(config, api_key))
    }

    pub fn backend(&self) -> LlmBackend {
        self.config.backend
    }

    pub fn model(&self) -> &str {
        self.config.model()
    }

    /// Generate a response (sync)
    pub fn generate(&self, messages: Vec<Message>, system: Option<&str>) -> AiResult<String> {
        debug!(
            "Requesting completion from {} ({})",
            self.config.backend,
            self.config.model()
        );
        if self.config.backend.is_openai_compatible() {
            self.generate_openai(messages, system)
        } else {
            self.generate_anthropic(messages, system)
        }
    }

    fn generate_openai(
        &self,
        mut messages: Vec<Message>,
        system: Option<&str>,
    ) -> AiResult<String> {
        if let Some(sys) = system {
            messages.insert(0, Message::system(sys));
        }

        let body = OpenAiRequest {
            model: self.config.model().to_string(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let mut req = self
            .agent
            .post(self.config.api_url())
            .header("Content-Type", "application/json");

        if self.config.backend.requires_api_key() {
            req = req.header("Authorization", &format!("Bearer {}", self.api_key));
        }

        let response = req.send_json(&body).map_err(|e| AiError::ApiError {
            status: 0,
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let error_text = response.into_body().read_to_string().unwrap_or_default();
            return Err(AiError::ApiError {
                status,
                message: error_text,
            });
        }

        let resp: OpenAiResponse = response
            .into_body()
            .read_json()
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        resp.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AiError::ParseError("No response choices".to_string()))
    }

    fn generate_anthropic(&self, messages: Vec<Message>, system: Option<&str>) -> AiResult<String> {
        let messages: Vec<_> = messages
            .into_iter()
            .filter(|m| m.role != Role::System)
            .collect();

        let body = AnthropicRequest {
            model: self.config.model().to_string(),
            max_tokens: self.config.max_tokens,
            messages,
            system: system.map(|s| s.to_string()),
            temperature: Some(self.config.temperature),
        };

        let response = self
            .agent
            .post(self.config.api_url())
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .send_json(&body)
            .map_err(|e| AiError::ApiError {
                status: 0,
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let error_text = response.into_body().read_to_string().unwrap_or_default();
            return Err(AiError::ApiError {
                status,
                message: error_text,
            });
        }

        let resp: AnthropicResponse = response
            .into_body()
            .read_json()
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        resp.content
            .into_iter()
            .find(|c| c.content_type == "text")
            .map(|c| c.text)
            .ok_or_else(|| AiError::ParseError("No text content in response".to_string()))
    }
}

impl TextGenerator for AiClient {
    fn generate(&self, prompt: &str) -> AiResult<String> {
        AiClient::generate(
            self,
            vec![Message::user(prompt)],
            Some(PromptTemplate::system_prompt()),
        )
    }
}

// OpenAI API types
#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: String,
}

// Anthropic API types
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}
