//! OpenRouter chat completions client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{
    error::CompletionError,
    provider::CompletionProvider,
    types::{CompletionRequest, CompletionResponse},
};

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Endpoint, credentials and attribution headers for the completion API
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Full URL of the chat completions endpoint
    pub endpoint: String,
    /// Sent as `Authorization: Bearer <api_key>`
    pub api_key: String,
    /// Sent as `HTTP-Referer`
    pub site_url: String,
    /// Sent as `X-Title`
    pub app_title: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: String::new(),
            site_url: "http://localhost:5000".to_string(),
            app_title: "RouterChat".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Client for OpenRouter's OpenAI-compatible completions endpoint
pub struct OpenRouterClient {
    http_client: Client,
    config: CompletionConfig,
}

impl OpenRouterClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                CompletionError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let response = self
            .http_client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", &self.config.site_url)
            .header("X-Title", &self.config.app_title)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::HttpError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: CompletionResponse = serde_json::from_str(&body)?;
        parsed.into_reply()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompletionConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_client_keeps_endpoint() {
        let config = CompletionConfig {
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            ..Default::default()
        };
        let client = OpenRouterClient::new(config).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:9/v1/chat/completions");
    }
}
