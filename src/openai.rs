use crate::config::Config;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// Send one system + user exchange and return the assistant's reply.
///
/// The model is asked for a JSON object; callers still parse defensively
/// with [`parse_json_reply`].
pub async fn complete_json(
    client: &reqwest::Client,
    config: &Config,
    system_prompt: &str,
    user_prompt: &str,
) -> Result<String> {
    let request = ChatRequest {
        model: config.openai_model.clone(),
        messages: vec![
            Message {
                role: "system".to_string(),
                content: system_prompt.to_string(),
            },
            Message {
                role: "user".to_string(),
                content: user_prompt.to_string(),
            },
        ],
        max_tokens: config.openai_max_tokens,
        temperature: config.openai_temperature,
        response_format: ResponseFormat {
            kind: "json_object".to_string(),
        },
    };

    let response = client
        .post(&config.openai_api_url)
        .header("Authorization", format!("Bearer {}", config.openai_api_key))
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await
        .context("Failed to send request to OpenAI API")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
        anyhow::bail!("OpenAI API error ({}): {}", status, body);
    }

    let chat_response: ChatResponse = response
        .json()
        .await
        .context("Failed to parse OpenAI response")?;

    chat_response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .context("OpenAI response contained no choices")
}

/// Parse a model reply as JSON.
///
/// Replies wrapped in prose or code fences are salvaged by parsing the span
/// between the first `{` and the last `}`.
pub fn parse_json_reply<T: serde::de::DeserializeOwned>(reply: &str) -> Result<T> {
    let direct_err = match serde_json::from_str::<T>(reply.trim()) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let span = extract_json_object(reply)
        .with_context(|| format!("Model reply is not JSON: {}", direct_err))?;
    serde_json::from_str(span).context("Failed to parse JSON object in model reply")
}

/// Substring from the first `{` through the last `}`, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
