// OpenAI API client
// Supports: Image generation (DALL-E 3), Text-to-Speech (tts-1)

use crate::types::WordInfo;
use backoff::{future::retry, ExponentialBackoff};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize, Debug)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub size: String,
    pub quality: String,
    pub n: u32,
}

#[derive(Deserialize, Debug)]
pub struct ImageGenerationResponse {
    pub data: Vec<GeneratedImage>,
}

#[derive(Deserialize, Debug)]
pub struct GeneratedImage {
    pub url: String,
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct SpeechRequest {
    pub model: String,
    pub input: String,
    pub voice: String,
    pub response_format: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Generate a 1024x1024 illustration with DALL-E 3 and download the
    /// resulting PNG bytes
    pub async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, String> {
        let request_body = ImageGenerationRequest {
            model: "dall-e-3".to_string(),
            prompt: prompt.to_string(),
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
            n: 1,
        };

        let backoff_config = ExponentialBackoff {
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(30),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(300)),
            ..Default::default()
        };

        let operation = || async {
            let response = self
                .client
                .post(format!("{}/images/generations", self.base_url))
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .timeout(Duration::from_secs(180))
                .json(&request_body)
                .send()
                .await
                .map_err(|e| {
                    if e.is_connect() || e.is_timeout() {
                        tracing::warn!("OpenAI images connection error (retrying): {}", e);
                        backoff::Error::transient(format!("Connection error: {}", e))
                    } else {
                        backoff::Error::permanent(format!("Request error: {}", e))
                    }
                })?;

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                let error_text = response.text().await.unwrap_or_default();
                tracing::warn!("OpenAI images API returned {} (retrying)", status);
                return Err(backoff::Error::transient(format!(
                    "API error ({}): {}",
                    status, error_text
                )));
            }
            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();
                return Err(backoff::Error::permanent(format!(
                    "API error ({}): {}",
                    status, error_text
                )));
            }

            response
                .json::<ImageGenerationResponse>()
                .await
                .map_err(|e| backoff::Error::permanent(format!("Failed to parse response: {}", e)))
        };

        let generated = retry(backoff_config, operation).await?;
        let image = generated
            .data
            .first()
            .ok_or_else(|| "OpenAI images API returned no images".to_string())?;
        if let Some(revised) = &image.revised_prompt {
            tracing::debug!("DALL-E revised prompt: {}", revised);
        }

        // The API returns a short-lived URL rather than inline bytes
        let image_response = self
            .client
            .get(&image.url)
            .timeout(Duration::from_secs(120))
            .send()
            .await
            .map_err(|e| format!("Failed to download generated image: {}", e))?;

        if !image_response.status().is_success() {
            return Err(format!(
                "Image download failed ({})",
                image_response.status()
            ));
        }

        let bytes = image_response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read image bytes: {}", e))?;
        Ok(bytes.to_vec())
    }

    /// Generate speech from text and return the MP3 bytes
    pub async fn text_to_speech(&self, text: &str, voice: &str) -> Result<Vec<u8>, String> {
        let request_body = SpeechRequest {
            model: "tts-1".to_string(),
            input: text.to_string(),
            voice: voice.to_string(),
            response_format: "mp3".to_string(),
        };

        let response = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(Duration::from_secs(120))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| format!("OpenAI speech request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!("OpenAI speech API error ({}): {}", status, error_text));
        }

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read speech bytes: {}", e))?;
        Ok(audio_bytes.to_vec())
    }
}

/// Build the illustration prompt from a word's definition and example
pub fn build_image_prompt(word_info: &WordInfo) -> String {
    format!(
        "Please make a picture of the word \"{}\", so a 5 year old can understand what the word means. \
         The definition of the word is: \"{}\". \
         The example of the word is: \"{}\".",
        word_info.word, word_info.definition, word_info.example
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_prompt_quotes_all_fields() {
        let info = WordInfo {
            word: "apple".to_string(),
            definition: "A round fruit.".to_string(),
            example: "For example, I ate an apple.".to_string(),
        };
        let prompt = build_image_prompt(&info);
        assert!(prompt.contains("\"apple\""));
        assert!(prompt.contains("\"A round fruit.\""));
        assert!(prompt.contains("\"For example, I ate an apple.\""));
    }
}
