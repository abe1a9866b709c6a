//! HTTP client for the remote Ollama service behind the tunnel.
//!
//! The client layer is split into:
//! - `http`: reqwest-backed [`InferenceClient`] for `/api/tags`,
//!   `/v1/chat/completions`, and `/api/generate`
//! - `fallback`: transcript flattening and the primary-then-fallback
//!   [`chat`] flow

use crate::error::ClientError;
use crate::types::Message;
use async_trait::async_trait;

mod fallback;
mod http;

pub use fallback::{chat, flatten_transcript, generate_fallback, ChatReply, FallbackReply, ReplyPath};
pub use http::InferenceClient;

/// Sampling temperature sent on both request paths.
pub const TEMPERATURE: f64 = 0.8;
/// Nucleus-sampling parameter sent on both request paths.
pub const TOP_P: f64 = 0.9;

/// Remote inference surface used by the session controller and setup.
///
/// Tests provide scripted implementations; production uses
/// [`InferenceClient`].
#[async_trait]
pub trait InferenceApi: Send + Sync {
    /// Short-timeout status query. Any failure is `false`.
    async fn probe_endpoint(&self) -> bool;

    /// Names of the models installed on the remote service.
    async fn list_models(&self) -> Result<Vec<String>, ClientError>;

    /// OpenAI-compatible chat completion over the full transcript.
    async fn chat_completion(&self, messages: &[Message], model: &str)
        -> Result<String, ClientError>;

    /// Single-shot, non-streaming generation from a flat prompt.
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, ClientError>;

    /// Check that `model` is installed and return the full model list.
    async fn ensure_model(&self, model: &str) -> Result<Vec<String>, ClientError> {
        let available = self.list_models().await?;
        if available.iter().any(|name| model_matches(name, model)) {
            Ok(available)
        } else {
            Err(ClientError::ModelNotFound {
                model: model.to_string(),
                available,
            })
        }
    }
}

/// Ollama reports untagged models with an explicit `:latest` suffix.
pub(crate) fn model_matches(installed: &str, wanted: &str) -> bool {
    installed == wanted
        || (!wanted.contains(':') && installed.strip_suffix(":latest") == Some(wanted))
}
