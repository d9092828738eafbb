//! Assistant API client implementation

use crate::{
    completions::{ChatRequest, ChatResponse},
    error::AssistantError,
};
use reqwest::{Client, StatusCode};

/// Default endpoint for the hosted model service
pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1";

/// Assistant API client
///
/// Speaks the OpenAI-compatible chat-completions protocol used by the hosted
/// model service.
#[derive(Clone)]
pub struct AssistantClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl AssistantClient {
    /// Create a new client with API key from environment
    ///
    /// Reads `RAILFLOW_AI_API_KEY`, and optionally `RAILFLOW_AI_BASE_URL` to
    /// point at a different OpenAI-compatible endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AssistantError::MissingApiKey` if `RAILFLOW_AI_API_KEY` is not set
    pub fn from_env() -> Result<Self, AssistantError> {
        let api_key =
            std::env::var("RAILFLOW_AI_API_KEY").map_err(|_| AssistantError::MissingApiKey)?;

        let mut client = Self::new(api_key);
        if let Ok(base_url) = std::env::var("RAILFLOW_AI_BASE_URL") {
            client.api_url = base_url;
        }

        Ok(client)
    }

    /// Create a new client with explicit API key
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Builder: Override the API base URL
    #[must_use]
    pub fn with_base_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Create a chat completion
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, AssistantError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<ChatResponse>()
                .await
                .map_err(|e| AssistantError::ResponseParseFailed(e.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(AssistantError::RateLimited),
            StatusCode::UNAUTHORIZED => Err(AssistantError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AssistantError::ApiError {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_creation() {
        let client = AssistantClient::new("test-key".to_string());
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_base_url_override() {
        let client =
            AssistantClient::new("test-key".to_string()).with_base_url("http://localhost:9999/v1");
        assert_eq!(client.api_url, "http://localhost:9999/v1");
    }

    #[tokio::test]
    async fn test_chat_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{
                    "id": "cmpl-1",
                    "model": "llama-3.3-70b-versatile",
                    "choices": [
                        {"index": 0, "message": {"role": "assistant", "content": "On time"}, "finish_reason": "stop"}
                    ]
                }"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let client = AssistantClient::new("test-key".to_string()).with_base_url(server.uri());
        let response = client
            .chat(ChatRequest::new(vec![ChatMessage::user("status?")]))
            .await
            .unwrap();

        assert_eq!(response.text(), "On time");
    }

    #[tokio::test]
    async fn test_chat_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = AssistantClient::new("test-key".to_string()).with_base_url(server.uri());
        let result = client
            .chat(ChatRequest::new(vec![ChatMessage::user("status?")]))
            .await;

        assert!(matches!(result, Err(AssistantError::RateLimited)));
    }

    #[tokio::test]
    async fn test_chat_unexpected_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = AssistantClient::new("test-key".to_string()).with_base_url(server.uri());
        let result = client
            .chat(ChatRequest::new(vec![ChatMessage::user("status?")]))
            .await;

        assert!(matches!(
            result,
            Err(AssistantError::ApiError { status: 500, .. })
        ));
    }
}
