//! Domain query shapes over the assistant client
//!
//! Each helper wraps one prompt the booking UI needs: UX recommendations for
//! the analytics dashboard, station-name autocomplete, live train status,
//! route tips, and the multi-turn chat session. All of them return typed
//! results; callers degrade failures to empty/fallback values.

use crate::{
    client::AssistantClient,
    completions::ChatRequest,
    error::AssistantError,
    types::{ChatMessage, SourceLink},
};
use serde::Deserialize;
use serde_json::Value;

/// System prompt for the booking chat bot
pub const CHAT_SYSTEM_PROMPT: &str = "You are RailFlow AI, a helpful railway booking assistant. \
You help users with train schedules, food options, baggage rules, and general IRCTC-related \
queries. Be professional, friendly, and concise.";

/// A single UX recommendation for the analytics dashboard
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UxRecommendation {
    /// The recommended change
    pub recommendation: String,
    /// Why it should help
    pub reason: String,
    /// Expected impact (High/Medium)
    pub impact_level: String,
}

/// Station-name autocomplete result
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StationSuggestions {
    /// Suggested station labels, e.g. `"New Delhi (NDLS)"`
    pub suggestions: Vec<String>,
    /// Optional grounding citations
    pub sources: Vec<SourceLink>,
}

/// Live running status answer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiveStatus {
    /// Status text to display
    pub text: String,
    /// Optional grounding citations
    pub sources: Vec<SourceLink>,
}

/// One reply from the chat session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatReply {
    /// Assistant answer
    pub text: String,
    /// Optional grounding citations
    pub sources: Vec<SourceLink>,
}

/// Extract the first JSON object or array embedded in completion text
///
/// Models asked for JSON still wrap it in prose or code fences often enough
/// that the raw text cannot be parsed directly.
#[must_use]
pub fn extract_json(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }

    let object = slice_between(text, '{', '}');
    let array = slice_between(text, '[', ']');

    // Whichever payload starts first wins, mirroring a leftmost regex match
    let candidate = match (object, array) {
        (Some(o), Some(a)) => {
            if o.1 <= a.1 {
                Some(o.0)
            } else {
                Some(a.0)
            }
        },
        (Some(o), None) => Some(o.0),
        (None, Some(a)) => Some(a.0),
        (None, None) => None,
    }?;

    serde_json::from_str(candidate).ok()
}

fn slice_between(text: &str, open: char, close: char) -> Option<(&str, usize)> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end > start {
        Some((&text[start..=end], start))
    } else {
        None
    }
}

/// UX recommendations from booking funnel metrics
///
/// The metrics value is embedded verbatim in the prompt; the answer is a list
/// of `{recommendation, reason, impactLevel}` records, possibly wrapped in a
/// single-key object, which is unwrapped here.
///
/// # Errors
///
/// Returns an error on transport failure or when no recommendation list can
/// be recovered from the completion.
pub async fn ux_recommendations(
    client: &AssistantClient,
    metrics: &Value,
) -> Result<Vec<UxRecommendation>, AssistantError> {
    let prompt = format!(
        "Based on the following railway booking funnel metrics: {metrics}, \
         provide 3 actionable UX recommendations to improve conversion. \
         Format as JSON with fields: recommendation, reason, impactLevel (High/Medium). \
         Return valid JSON only."
    );

    let request = ChatRequest::new(vec![
        ChatMessage::system(
            "You are a UX expert. Analyze the railway booking metrics and provide recommendations.",
        ),
        ChatMessage::user(prompt),
    ])
    .with_json_response();

    let response = client.chat(request).await?;
    let parsed = extract_json(response.text()).ok_or(AssistantError::EmptyCompletion)?;

    let list = match parsed {
        Value::Array(_) => parsed,
        // Wrapped in a key like "recommendations"
        Value::Object(map) => map
            .into_iter()
            .map(|(_, v)| v)
            .find(Value::is_array)
            .ok_or(AssistantError::EmptyCompletion)?,
        _ => return Err(AssistantError::EmptyCompletion),
    };

    serde_json::from_value(list).map_err(|e| AssistantError::ResponseParseFailed(e.to_string()))
}

/// Station-name autocomplete
///
/// Queries shorter than two characters short-circuit to an empty result
/// without calling the model.
///
/// # Errors
///
/// Returns an error on transport failure or an unparseable completion.
pub async fn station_suggestions(
    client: &AssistantClient,
    query: &str,
) -> Result<StationSuggestions, AssistantError> {
    if query.len() < 2 {
        return Ok(StationSuggestions::default());
    }

    let prompt = format!(
        "Provide a list of 5 real Indian Railway stations starting with or matching the query: \
         \"{query}\". Return only the official station names and their codes in brackets, e.g., \
         \"New Delhi (NDLS)\". Return the result as a JSON object with a key \"suggestions\" \
         containing the array of strings."
    );

    let request = ChatRequest::new(vec![
        ChatMessage::system("You are a helpful Indian Railways assistant."),
        ChatMessage::user(prompt),
    ])
    .with_json_response();

    let response = client.chat(request).await?;
    let parsed = extract_json(response.text()).ok_or(AssistantError::EmptyCompletion)?;

    let suggestions = parsed
        .get("suggestions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(StationSuggestions {
        suggestions,
        sources: Vec::new(),
    })
}

/// Live running status of a train
///
/// # Errors
///
/// Returns an error on transport failure or an empty completion.
pub async fn live_status(
    client: &AssistantClient,
    train_number: &str,
    train_name: &str,
) -> Result<LiveStatus, AssistantError> {
    let prompt = format!(
        "What is the current live running status of Train {train_number} ({train_name})? \
         Include platform info and delay if possible. Be concise."
    );

    let request = ChatRequest::new(vec![
        ChatMessage::system(
            "You are a helpful Indian Railways assistant with access to real-time info.",
        ),
        ChatMessage::user(prompt),
    ]);

    let response = client.chat(request).await?;
    let text = response.text();
    if text.is_empty() {
        return Err(AssistantError::EmptyCompletion);
    }

    Ok(LiveStatus {
        text: text.to_string(),
        sources: Vec::new(),
    })
}

/// Short travel tips for a route
///
/// # Errors
///
/// Returns an error on transport failure.
pub async fn route_tips(
    client: &AssistantClient,
    from: &str,
    to: &str,
) -> Result<String, AssistantError> {
    let prompt = format!(
        "Give 2 very short, helpful travel tips for a train journey from {from} to {to}. \
         Focus on food, scenic views, or timing. Max 15 words each."
    );

    let request = ChatRequest::new(vec![ChatMessage::user(prompt)]).with_max_tokens(100);

    let response = client.chat(request).await?;
    Ok(response.text().to_string())
}

/// Stateful multi-turn chat session
///
/// Holds the full conversation history and replays it on every turn, the way
/// the chat-completions protocol expects.
pub struct ChatSession {
    client: AssistantClient,
    history: Vec<ChatMessage>,
}

impl ChatSession {
    /// Start a session seeded with the RailFlow system prompt
    #[must_use]
    pub fn new(client: AssistantClient) -> Self {
        Self {
            client,
            history: vec![ChatMessage::system(CHAT_SYSTEM_PROMPT)],
        }
    }

    /// Start a session with a custom system instruction
    #[must_use]
    pub fn with_system_prompt(client: AssistantClient, system: impl Into<String>) -> Self {
        Self {
            client,
            history: vec![ChatMessage::system(system)],
        }
    }

    /// Number of messages exchanged so far (including the system prompt)
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Send one user message and return the assistant reply
    ///
    /// The user message stays in the history even when the call fails, so a
    /// retry continues the same conversation.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn send_message(&mut self, text: impl Into<String>) -> Result<ChatReply, AssistantError> {
        self.history.push(ChatMessage::user(text));

        let request = ChatRequest::new(self.history.clone());
        let response = self.client.chat(request).await?;
        let answer = response.text().to_string();

        self.history.push(ChatMessage::assistant(answer.clone()));

        Ok(ChatReply {
            text: answer,
            sources: Vec::new(),
        })
    }
}
