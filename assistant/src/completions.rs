//! Chat-completions request and response types

use crate::types::{ChatMessage, Usage};
use serde::{Deserialize, Serialize};

/// Default model requested when none is configured
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Request to create a chat completion
#[derive(Clone, Debug, Serialize)]
pub struct ChatRequest {
    /// Model to use
    pub model: String,
    /// Conversation history
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Response format constraint (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    /// Create a basic request with sensible defaults
    #[must_use]
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            messages,
            max_tokens: None,
            response_format: None,
        }
    }

    /// Builder: Set model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builder: Set max tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Builder: Constrain the completion to a JSON object
    #[must_use]
    pub fn with_json_response(mut self) -> Self {
        self.response_format = Some(ResponseFormat::json_object());
        self
    }
}

/// Response format constraint
#[derive(Clone, Debug, Serialize)]
pub struct ResponseFormat {
    /// Format kind, e.g. `json_object`
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    /// The `json_object` constraint
    #[must_use]
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

/// Response from creating a chat completion
#[derive(Clone, Debug, Deserialize)]
pub struct ChatResponse {
    /// Unique identifier for this completion
    #[serde(default)]
    pub id: String,
    /// Model that generated the response
    #[serde(default)]
    pub model: String,
    /// Completion choices (the first one carries the answer)
    pub choices: Vec<Choice>,
    /// Token usage statistics
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Text content of the first choice, empty when the model returned none
    #[must_use]
    pub fn text(&self) -> &str {
        self.choices
            .first()
            .map_or("", |choice| choice.message.content.as_str())
    }
}

/// A single completion choice
#[derive(Clone, Debug, Deserialize)]
pub struct Choice {
    /// Position in the choices list
    #[serde(default)]
    pub index: u32,
    /// The generated message
    pub message: ChatMessage,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}
