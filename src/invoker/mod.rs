//! Model invocation with ordered fallback
//!
//! Backends are tried in a fixed priority order for every call; the order
//! encodes a cost/capability preference and the first success wins. There is
//! no health tracking across calls and no comparison between backends.
//!
//! # Example
//!
//! ```ignore
//! use upgrade_triage::invoker::FallbackChain;
//!
//! let chain = FallbackChain::from_config(&config);
//! let (assessment, backend) = chain.assess(&instruction).await?;
//! println!("{} says: {}", backend, assessment.change_type);
//! ```

mod http_backend;
mod response;
mod types;

pub use http_backend::HttpBackend;
pub use response::{ChangeAssessment, ChangeType};
#[allow(unused_imports)]
pub use types::{BackendError, InvokeError, ModelBackend};

use crate::config::TriageConfig;
use tracing::{debug, warn};

/// Ordered list of backends, tried first-to-last until one answers
pub struct FallbackChain {
    backends: Vec<Box<dyn ModelBackend>>,
}

impl FallbackChain {
    /// Create a chain from explicit backends
    pub fn new(backends: Vec<Box<dyn ModelBackend>>) -> Self {
        Self { backends }
    }

    /// Create a chain of HTTP backends from the enabled config entries
    pub fn from_config(config: &TriageConfig) -> Self {
        let backends = config
            .enabled_backends()
            .map(|b| {
                Box::new(HttpBackend::from_config(b, config.defaults.timeout))
                    as Box<dyn ModelBackend>
            })
            .collect();
        Self { backends }
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// Run one invocation: walk the chain for a raw response, then parse it
    ///
    /// Rate limits and other backend failures both fall through to the next
    /// backend; they are only logged differently. A response that reaches
    /// parsing ends the walk either way: a malformed answer from a backend
    /// that did respond is not retried against the rest of the chain (the
    /// caller's attempt loop covers that).
    pub async fn assess(&self, instruction: &str) -> Result<(ChangeAssessment, String), InvokeError> {
        let mut answer = None;

        for backend in &self.backends {
            match backend.complete(instruction).await {
                Ok(text) => {
                    debug!(backend = backend.name(), "backend responded");
                    answer = Some((text, backend.name().to_string()));
                    break;
                }
                Err(e) if e.is_rate_limit() => {
                    warn!(backend = backend.name(), "rate limited: {}", e);
                }
                Err(e) => {
                    warn!(backend = backend.name(), "backend failed: {}", e);
                }
            }
        }

        let (text, backend) = answer.ok_or(InvokeError::Exhausted)?;

        let assessment = response::parse_assessment(&text).map_err(|message| {
            warn!(backend = %backend, "malformed response: {}", message);
            InvokeError::Malformed {
                backend: backend.clone(),
                message,
            }
        })?;

        Ok((assessment, backend))
    }
}
