//! # RailFlow Assistant
//!
//! Client for the hosted large-language-model service backing RailFlow's
//! assistant features: the booking chat bot, station-name autocomplete,
//! live train status, route tips, and UX recommendations for the analytics
//! dashboard.
//!
//! The client speaks the OpenAI-compatible chat-completions wire format.
//! Every query shape returns a typed `Result`; callers are expected to treat
//! failures as degraded results (empty list, fallback string), never as
//! booking-flow errors.
//!
//! ## Example
//!
//! ```ignore
//! use railflow_assistant::{AssistantClient, queries};
//!
//! let client = AssistantClient::from_env()?;
//! let suggestions = queries::station_suggestions(&client, "coim").await?;
//! ```

pub mod client;
pub mod completions;
pub mod error;
pub mod queries;
pub mod types;

pub use client::AssistantClient;
pub use error::AssistantError;
pub use queries::{ChatReply, ChatSession, LiveStatus, StationSuggestions, UxRecommendation};
pub use types::{ChatMessage, Role, SourceLink};
