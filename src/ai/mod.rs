//! AI-powered dataset insights
//!
//! The insight pass turns a profile (metrics plus issues) into a short
//! narrative assessment and a list of recommendations. Text generation goes
//! through the narrow [`TextGenerator`] seam so prompt construction and
//! response parsing can be exercised without any network service. The
//! bundled [`AiClient`] implements it over sync HTTP with a bring-your-own-key
//! model.
//!
//! # Environment Variables
//!
//! - `ANTHROPIC_API_KEY`: Required for the Anthropic backend (default)
//! - `OPENAI_API_KEY`: Required for the OpenAI backend
//! - `OPENROUTER_API_KEY`: Required for the OpenRouter backend
//!
//! Ollama needs no key; its URL comes from `ollama_url` in the user config.
//!
//! # Example
//!
//! ```rust,ignore
//! use dataprobe::ai::{AiClient, LlmBackend};
//! use dataprobe::config::UserConfig;
//!
//! let config = UserConfig::load()?;
//! let client = AiClient::from_user_config(&config, Some(LlmBackend::Anthropic))?;
//! let result = dataprobe::generate_insights("sales.csv", &metrics, &issues, &client);
//! ```

mod client;
mod insights;
mod prompts;

pub use client::{AiClient, AiConfig, LlmBackend, Message, Role};
pub use insights::{
    parse_insights, ParsedInsights, ASSESSMENT_FALLBACK_CHARS, FALLBACK_RECOMMENDATIONS,
    MAX_RECOMMENDATIONS,
};
pub use prompts::{InsightPromptBuilder, PromptTemplate};

use thiserror::Error;

/// Errors that can occur in the AI module
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Missing API key: {env_var} not set. Get your key at {signup_url}")]
    MissingApiKey { env_var: String, signup_url: String },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Text generator returned an empty response")]
    EmptyResponse,
}

pub type AiResult<T> = Result<T, AiError>;

/// Prompt in, text or failure out.
///
/// Implementations are treated as unreliable and possibly slow. Callers add
/// no retry policy of their own.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> AiResult<String>;
}

impl<F> TextGenerator for F
where
    F: Fn(&str) -> AiResult<String>,
{
    fn generate(&self, prompt: &str) -> AiResult<String> {
        self(prompt)
    }
}
