#![allow(dead_code)]

//! HTTP API-based model backend (OpenAI-compatible)

use super::types::{BackendError, ModelBackend};
use crate::config::BackendConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Backend talking to an OpenAI-compatible chat completions API (Groq)
#[derive(Debug, Clone)]
pub struct HttpBackend {
    /// Model ID, also used as the backend name
    model: String,

    /// Base URL for the API
    base_url: String,

    /// API key (if required)
    api_key: Option<String>,

    /// Default timeout
    timeout: Duration,

    /// HTTP client
    client: reqwest::Client,
}

/// OpenAI-compatible chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

/// OpenAI-compatible chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl HttpBackend {
    /// Create a backend from config, using the global timeout where the
    /// backend doesn't set its own
    pub fn from_config(config: &BackendConfig, default_timeout: u64) -> Self {
        let timeout = Duration::from_secs(config.timeout.unwrap_or(default_timeout));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            timeout,
            client,
        }
    }

    /// Create a backend with explicit parameters
    pub fn new(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("failed to build HTTP client");

        Self {
            model: model.into(),
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(300),
            client,
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the chat completion URL
    fn chat_completion_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }

    /// Map HTTP status to BackendError
    fn map_http_error(&self, status: reqwest::StatusCode, body: &str) -> BackendError {
        match status.as_u16() {
            401 | 403 => BackendError::auth(format!("HTTP {}: {}", status, body)),
            429 => {
                let retry_after = self.parse_retry_after(body);
                BackendError::rate_limit(retry_after)
            }
            408 | 504 => BackendError::timeout(self.timeout),
            400..=499 => BackendError::config(format!("HTTP {}: {}", status, body)),
            500..=599 => BackendError::network(format!("HTTP {}: {}", status, body)),
            _ => BackendError::network(format!("unexpected HTTP {}: {}", status, body)),
        }
    }

    /// Try to parse retry-after from an error response body
    fn parse_retry_after(&self, body: &str) -> Option<Duration> {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
            if let Some(seconds) = json.get("retry_after").and_then(|v| v.as_f64()) {
                return Some(Duration::from_secs_f64(seconds));
            }
        }
        None
    }
}

#[async_trait]
impl ModelBackend for HttpBackend {
    async fn complete(&self, instruction: &str) -> Result<String, BackendError> {
        let start = Instant::now();

        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".into(),
                content: instruction.to_string(),
            }],
        };

        let mut http_request = self.client.post(self.chat_completion_url()).json(&body);

        if let Some(ref key) = self.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {}", key));
        }

        let result = tokio::time::timeout(self.timeout, http_request.send()).await;
        let elapsed = start.elapsed();

        match result {
            Ok(Ok(response)) => {
                let status = response.status();

                if status.is_success() {
                    let completion: ChatCompletionResponse =
                        response.json().await.map_err(|e| {
                            BackendError::parse(format!("failed to parse response: {}", e))
                        })?;

                    Ok(completion
                        .choices
                        .first()
                        .and_then(|c| c.message.content.clone())
                        .unwrap_or_default())
                } else {
                    let body = response.text().await.unwrap_or_default();
                    Err(self.map_http_error(status, &body))
                }
            }
            Ok(Err(e)) => {
                if e.is_timeout() {
                    Err(BackendError::timeout(elapsed))
                } else if e.is_connect() {
                    Err(BackendError::network(format!("connection failed: {}", e)))
                } else {
                    Err(BackendError::network(format!("request failed: {}", e)))
                }
            }
            Err(_) => Err(BackendError::timeout(elapsed)),
        }
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;

    #[test]
    fn test_http_backend_builder() {
        let backend = HttpBackend::new("llama3-8b-8192", "https://api.groq.com/openai/v1")
            .with_api_key("gsk-test")
            .with_timeout(Duration::from_secs(60));

        assert_eq!(backend.name(), "llama3-8b-8192");
        assert_eq!(backend.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(backend.api_key, Some("gsk-test".into()));
        assert_eq!(backend.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_chat_completion_url() {
        let backend = HttpBackend::new("test", "https://api.example.com/v1");
        assert_eq!(
            backend.chat_completion_url(),
            "https://api.example.com/v1/chat/completions"
        );

        // With trailing slash
        let backend = HttpBackend::new("test", "https://api.example.com/v1/");
        assert_eq!(
            backend.chat_completion_url(),
            "https://api.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_map_http_error() {
        let backend = HttpBackend::new("test", "https://example.com");

        let err = backend.map_http_error(reqwest::StatusCode::UNAUTHORIZED, "bad token");
        assert!(matches!(err, BackendError::Auth { .. }));

        let err = backend.map_http_error(reqwest::StatusCode::TOO_MANY_REQUESTS, "rate limited");
        assert!(matches!(err, BackendError::RateLimit { .. }));

        let err = backend.map_http_error(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "error");
        assert!(matches!(err, BackendError::Network { .. }));
    }

    #[test]
    fn test_retry_after_from_body() {
        let backend = HttpBackend::new("test", "https://example.com");

        let err = backend.map_http_error(
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            r#"{"retry_after": 7.5}"#,
        );
        assert_eq!(err.retry_after(), Some(Duration::from_secs_f64(7.5)));
    }

    #[test]
    fn test_from_config() {
        let config = BackendConfig {
            model: "mixtral-8x7b-32768".into(),
            api_key: Some("gsk-test".into()),
            timeout: Some(120),
            ..Default::default()
        };

        let backend = HttpBackend::from_config(&config, 300);
        assert_eq!(backend.name(), "mixtral-8x7b-32768");
        assert_eq!(backend.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(backend.timeout, Duration::from_secs(120));

        let config = BackendConfig::for_model("gemma-7b-it");
        let backend = HttpBackend::from_config(&config, 300);
        assert_eq!(backend.timeout, Duration::from_secs(300));
    }
}
