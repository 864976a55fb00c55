use anyhow::{Context, Result};

pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_USER_AGENT: &str = "Linguistic Analysis Tool 1.0";

#[derive(Debug, Clone)]
pub struct Config {
    // OpenAI
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_api_url: String,
    pub openai_max_tokens: u32,
    pub openai_temperature: f32,

    // Page fetching
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_content_length: usize,

    // Output
    pub report_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // OpenAI
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY not set")?,
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            openai_api_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_API_URL.to_string()),
            openai_max_tokens: parse_env("OPENAI_MAX_TOKENS", 4000),
            // Lower temperature keeps scoring consistent between runs
            openai_temperature: parse_env("OPENAI_TEMPERATURE", 0.3),

            // Page fetching
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 30),
            user_agent: std::env::var("USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            max_content_length: parse_env("MAX_CONTENT_LENGTH", 100_000),

            // Output
            report_dir: std::env::var("REPORT_DIR").unwrap_or_else(|_| ".".to_string()),
        })
    }
}

/// Read a numeric variable, falling back to `default` when unset or unparsable
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
