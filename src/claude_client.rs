use crate::types::WordInfo;
use backoff::{future::retry, ExponentialBackoff};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SYSTEM_PROMPT: &str = "You are a kindergarten teacher. You are given a word and you need to explain it in a way that is easy to understand.";

#[derive(Debug, Clone)]
pub struct ClaudeClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaudeRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<ClaudeMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClaudeMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaudeResponse {
    pub id: String,
    pub model: String,
    pub role: String,
    pub content: Vec<ResponseContent>,
    pub stop_reason: Option<String>,
    pub usage: Usage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseContent {
    #[serde(rename = "text")]
    Text { text: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl ClaudeClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://api.anthropic.com/v1".to_string(),
            model: "claude-3-5-sonnet-20241022".to_string(),
        }
    }

    /// Ask Claude for a child-friendly definition and example sentence.
    /// The model is instructed to answer in strict JSON.
    pub async fn generate_word_info(&self, word: &str) -> Result<WordInfo, String> {
        let user_message = format!(
            "Can you explain the word {} in a way that is easy to understand for a 5 year old? \
             Please respond in JSON format with the following two fields: 'definition' and 'example'. \
             The definition should be no more than a couple of sentences explaining the most common definition(s) of the word. \
             The example should be a sentence that uses the word in a way that is easy to understand for a 5 year old. \
             Start the example sentence with something like 'For example, ...', 'Here is an example: ...', or 'An example would be ...'.",
            word
        );

        let response = self
            .send_message(vec![ClaudeMessage {
                role: "user".to_string(),
                content: user_message,
            }])
            .await?;

        let text = response
            .content
            .iter()
            .map(|block| match block {
                ResponseContent::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("");

        parse_word_info(word, &text)
    }

    async fn send_message(&self, messages: Vec<ClaudeMessage>) -> Result<ClaudeResponse, String> {
        let request = ClaudeRequest {
            model: self.model.clone(),
            max_tokens: 1024,
            messages,
            system: Some(SYSTEM_PROMPT.to_string()),
            temperature: Some(0.0),
        };

        let backoff_config = ExponentialBackoff {
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(30),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(300)),
            ..Default::default()
        };

        // Retry transient errors (429, 5xx, connection/timeout failures)
        let operation = || async {
            let response = self
                .client
                .post(format!("{}/messages", self.base_url))
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", "2023-06-01")
                .header("content-type", "application/json")
                .timeout(Duration::from_secs(120))
                .json(&request)
                .send()
                .await
                .map_err(|e| {
                    if e.is_connect() || e.is_timeout() {
                        tracing::warn!("Claude API connection error (retrying): {}", e);
                        backoff::Error::transient(format!("Connection error: {}", e))
                    } else {
                        backoff::Error::permanent(format!("Request error: {}", e))
                    }
                })?;

            let status = response.status();
            let response_text = response
                .text()
                .await
                .map_err(|e| backoff::Error::permanent(format!("Failed to read response: {}", e)))?;

            if status.as_u16() == 429 || status.is_server_error() {
                tracing::warn!("Claude API returned {} (retrying)", status);
                return Err(backoff::Error::transient(format!(
                    "API error ({}): {}",
                    status, response_text
                )));
            }

            if !status.is_success() {
                return Err(backoff::Error::permanent(format!(
                    "API error ({}): {}",
                    status, response_text
                )));
            }

            serde_json::from_str::<ClaudeResponse>(&response_text).map_err(|e| {
                backoff::Error::permanent(format!("Failed to parse Claude response: {}", e))
            })
        };

        let response = retry(backoff_config, operation).await?;
        tracing::debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Claude API call complete"
        );
        Ok(response)
    }
}

#[derive(Debug, Deserialize)]
struct WordInfoPayload {
    definition: String,
    example: String,
}

/// Parse the model's JSON answer into a WordInfo. The model occasionally
/// wraps the JSON in a markdown code fence, so strip that first.
pub fn parse_word_info(word: &str, text: &str) -> Result<WordInfo, String> {
    let payload: WordInfoPayload = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| format!("Failed to parse word info JSON for '{}': {}", word, e))?;
    Ok(WordInfo {
        word: word.to_string(),
        definition: payload.definition,
        example: payload.example,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop an optional language tag on the opening fence
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let info = parse_word_info(
            "apple",
            r#"{"definition": "A round fruit.", "example": "For example, I ate an apple."}"#,
        )
        .unwrap();
        assert_eq!(info.word, "apple");
        assert_eq!(info.definition, "A round fruit.");
        assert!(info.example.starts_with("For example"));
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "```json\n{\"definition\": \"A round fruit.\", \"example\": \"An example would be eating an apple.\"}\n```";
        let info = parse_word_info("apple", text).unwrap();
        assert_eq!(info.definition, "A round fruit.");
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        assert!(parse_word_info("apple", r#"{"definition": "only"}"#).is_err());
        assert!(parse_word_info("apple", "not json at all").is_err());
    }
}
