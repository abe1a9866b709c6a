//! Primary chat call with a single flattened-prompt fallback.

use super::InferenceApi;
use crate::error::ClientError;
use crate::types::{Message, Role};

/// Render messages as `"<Role>: <content>\n\n"` blocks followed by an
/// `"Assistant: "` cue.
pub fn flatten_transcript(messages: &[Message]) -> String {
    let mut prompt = String::new();
    for message in messages {
        prompt.push_str(message.role.label());
        prompt.push_str(": ");
        prompt.push_str(&message.content);
        prompt.push_str("\n\n");
    }
    prompt.push_str(Role::Assistant.label());
    prompt.push_str(": ");
    prompt
}

/// Outcome of the fallback call. Never an `Err`.
#[derive(Debug)]
pub struct FallbackReply {
    /// Generated text, or a human-readable error line when the call failed.
    pub text: String,
    /// Structured failure behind `text`, when there was one.
    pub error: Option<ClientError>,
}

/// Issue one `/api/generate` call over the flattened transcript.
pub async fn generate_fallback(
    api: &dyn InferenceApi,
    messages: &[Message],
    model: &str,
) -> FallbackReply {
    let prompt = flatten_transcript(messages);
    match api.generate(&prompt, model).await {
        Ok(text) => FallbackReply { text, error: None },
        Err(error) => {
            tracing::warn!(error = %error, "fallback generate failed");
            FallbackReply {
                text: fallback_error_text(&error),
                error: Some(error),
            }
        }
    }
}

fn fallback_error_text(error: &ClientError) -> String {
    match error {
        ClientError::Status { code, body } => format!("Error: {code} - {body}"),
        ClientError::Http(inner) => format!("Error calling Ollama API: {inner}"),
        other => format!("Error calling Ollama API: {other}"),
    }
}

/// Which request path produced a [`ChatReply`].
#[derive(Debug)]
pub enum ReplyPath {
    Primary,
    Fallback { primary_error: ClientError },
}

/// Assistant text plus how it was obtained.
#[derive(Debug)]
pub struct ChatReply {
    pub text: String,
    pub path: ReplyPath,
    /// Set when the fallback itself failed and `text` is an error line.
    pub error: Option<ClientError>,
}

impl ChatReply {
    pub fn used_fallback(&self) -> bool {
        matches!(self.path, ReplyPath::Fallback { .. })
    }
}

/// Try the chat-completion call, then fall back once on any error.
pub async fn chat(api: &dyn InferenceApi, messages: &[Message], model: &str) -> ChatReply {
    match api.chat_completion(messages, model).await {
        Ok(text) => ChatReply {
            text,
            path: ReplyPath::Primary,
            error: None,
        },
        Err(primary_error) => {
            tracing::info!(error = %primary_error, "primary chat call failed, using generate fallback");
            let fallback = generate_fallback(api, messages, model).await;
            ChatReply {
                text: fallback.text,
                path: ReplyPath::Fallback { primary_error },
                error: fallback.error,
            }
        }
    }
}
