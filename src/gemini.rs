use crate::config::Config;
use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for the Gemini `generateContent` REST endpoint.
///
/// One blocking round trip per call: a single text prompt in, generated
/// text out. The request timeout is the only resilience mechanism; there
/// is no retry, caching, or streaming.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GeminiClient {
    /// Creates a client from config plus a resolved, usable API key.
    pub fn new(config: &Config, api_key: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.gemini_timeout_secs))
            .build()
            .map_err(|e| {
                AppError::ExternalApi(format!("Failed to create Gemini client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.gemini_base_url.clone(),
            model: config.gemini_model.clone(),
            api_key,
        })
    }

    /// Sends one prompt and returns the raw generated text of the first
    /// candidate.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, AppError> {
        // Key goes in the query string; keep it out of the logs.
        let url = reqwest::Url::parse_with_params(
            &format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ),
            &[("key", self.api_key.as_str())],
        )
        .map_err(|e| AppError::ExternalApi(format!("Failed to build Gemini URL: {}", e)))?;

        tracing::debug!(
            "Gemini request: {}/v1beta/models/{}:generateContent?key=[REDACTED]",
            self.base_url,
            self.model
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApi(format!(
                "Gemini returned {}: {}",
                status, error_text
            )));
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|e| {
            AppError::ExternalApi(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                AppError::ExternalApi("Gemini response contained no candidates".to_string())
            })?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            port: 3001,
            gemini_api_key: Some("test-key".to_string()),
            gemini_model: "gemini-1.5-flash".to_string(),
            gemini_base_url: "https://example.com".to_string(),
            gemini_timeout_secs: 5,
        }
    }

    #[test]
    fn client_creation_succeeds() {
        let client = GeminiClient::new(&test_config(), "test-key".to_string());
        assert!(client.is_ok());
    }
}
