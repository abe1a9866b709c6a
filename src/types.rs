//! Chat data model and wire payloads for the remote inference service.
//!
//! Two payload families are covered: the OpenAI-compatible
//! `/v1/chat/completions` surface and Ollama's native `/api/generate` and
//! `/api/tags` endpoints.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Message roles
// ---------------------------------------------------------------------------

/// Conversation participant role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction message.
    System,
    /// End-user message.
    User,
    /// Assistant/model message.
    Assistant,
}

impl Role {
    /// Capitalized tag used when flattening a transcript into a prompt.
    pub fn label(self) -> &'static str {
        match self {
            Self::System => "System",
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// A single message in the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Author role for this conversation turn.
    pub role: Role,
    /// Text content.
    pub content: String,
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Chat completion request / response
// ---------------------------------------------------------------------------

/// Request body for POST /v1/chat/completions.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    /// Remote model identifier.
    pub model: &'a str,
    /// Full conversation history, seed system message included.
    pub messages: &'a [Message],
    pub temperature: f64,
    pub top_p: f64,
}

/// Response body from POST /v1/chat/completions.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// A single choice in the completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

/// Assistant payload inside a completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    /// Null for providers that return tool calls only.
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice, if the provider returned one.
    pub fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}

// ---------------------------------------------------------------------------
// Ollama native endpoints
// ---------------------------------------------------------------------------

/// Request body for POST /api/generate.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    pub temperature: f64,
    pub top_p: f64,
}

/// Non-streaming response body from POST /api/generate.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

/// Response body from GET /api/tags.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelTag>,
}

/// One locally-installed model on the remote service.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelTag {
    pub name: String,
}
