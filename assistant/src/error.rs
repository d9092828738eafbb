//! Error types for the assistant client

use thiserror::Error;

/// Errors that can occur when interacting with the assistant API
#[derive(Debug, Error)]
pub enum AssistantError {
    /// Missing `RAILFLOW_AI_API_KEY` environment variable
    #[error("Missing RAILFLOW_AI_API_KEY environment variable")]
    MissingApiKey,

    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response parsing failed
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Rate limited - too many requests
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Unauthorized - invalid API key
    #[error("Unauthorized - invalid API key")]
    Unauthorized,

    /// API returned an error
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// The completion carried no usable content
    #[error("Completion had no content")]
    EmptyCompletion,
}
