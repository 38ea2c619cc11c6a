#![allow(dead_code)]

//! Core types and traits for model invocation

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Error types that can occur while calling a backend
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// Request timed out
    #[error("timeout after {elapsed:?}")]
    Timeout { elapsed: Duration },

    /// Rate limited by the provider
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimit { retry_after: Option<Duration> },

    /// Authentication failed
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// Network error
    #[error("network error: {message}")]
    Network { message: String },

    /// Failed to parse the transport-level response
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Invalid configuration or request rejected by the provider
    #[error("invalid request: {message}")]
    Config { message: String },
}

impl BackendError {
    /// True for rate-limit conditions, which the fallback chain logs
    /// separately from other failures
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, BackendError::RateLimit { .. })
    }

    /// Get suggested retry delay for rate limit errors
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            BackendError::RateLimit { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Create a timeout error
    pub fn timeout(elapsed: Duration) -> Self {
        Self::Timeout { elapsed }
    }

    /// Create a rate limit error
    pub fn rate_limit(retry_after: Option<Duration>) -> Self {
        Self::RateLimit { retry_after }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Why a full invocation (one pass through the chain) produced no assessment
#[derive(Debug, Error)]
pub enum InvokeError {
    /// Every backend in the chain failed
    #[error("all backends exhausted")]
    Exhausted,

    /// A backend answered, but the text was not the expected JSON object
    #[error("malformed response from {backend}: {message}")]
    Malformed { backend: String, message: String },
}

/// Trait for model backends: send one instruction, get the full text back
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Send an instruction and return the raw response text
    async fn complete(&self, instruction: &str) -> Result<String, BackendError>;

    /// Get the backend name (model identifier)
    fn name(&self) -> &str;
}

#[async_trait]
impl ModelBackend for Box<dyn ModelBackend> {
    async fn complete(&self, instruction: &str) -> Result<String, BackendError> {
        (**self).complete(instruction).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
