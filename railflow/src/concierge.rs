//! Assistant-facing service with degradation.
//!
//! Wraps the raw assistant client for the booking UI: every call is bounded
//! by a timeout and collapses failure into an empty or fallback result, so an
//! unreachable model service can never gate a step transition. Autocomplete
//! additionally drops results that were superseded by a newer query before
//! they arrived.

use crate::analytics::FunnelMetrics;
use crate::types::Train;
use railflow_assistant::{
    AssistantClient, ChatSession, LiveStatus, StationSuggestions, UxRecommendation, queries,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Shown when live status cannot be fetched
pub const LIVE_STATUS_FALLBACK: &str = "Live status currently unavailable via RailFlow AI.";

/// Recommendations are only requested once the log carries enough sessions
pub const RECOMMENDATION_MIN_EVENTS: usize = 6;

/// Assistant service for the booking UI.
///
/// Constructed with `None` when no API key is configured; every query then
/// degrades immediately.
pub struct Concierge {
    client: Option<AssistantClient>,
    timeout: Duration,
    autocomplete_seq: AtomicU64,
}

impl Concierge {
    /// Create a concierge over an optional client
    #[must_use]
    pub const fn new(client: Option<AssistantClient>, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            autocomplete_seq: AtomicU64::new(0),
        }
    }

    /// Whether a model client is configured
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// UX recommendations for the analytics dashboard.
    ///
    /// Degrades to an empty list when the client is missing, slow, or fails.
    pub async fn recommendations(&self, metrics: &FunnelMetrics) -> Vec<UxRecommendation> {
        let Some(client) = &self.client else {
            return Vec::new();
        };

        let prompt_value = metrics.to_prompt_value();
        match tokio::time::timeout(self.timeout, queries::ux_recommendations(client, &prompt_value))
            .await
        {
            Ok(Ok(recommendations)) => recommendations,
            Ok(Err(error)) => {
                tracing::warn!(%error, "AI insights unavailable");
                Vec::new()
            },
            Err(_) => {
                tracing::warn!("AI insights timed out");
                Vec::new()
            },
        }
    }

    /// Station-name autocomplete.
    ///
    /// Returns `None` when a newer query superseded this one while it was in
    /// flight (the stale result must not be surfaced), and empty suggestions
    /// on failure.
    pub async fn suggest_stations(&self, query: &str) -> Option<StationSuggestions> {
        let ticket = self.autocomplete_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let result = match &self.client {
            Some(client) => {
                match tokio::time::timeout(self.timeout, queries::station_suggestions(client, query))
                    .await
                {
                    Ok(Ok(suggestions)) => suggestions,
                    Ok(Err(error)) => {
                        tracing::warn!(%error, "Station autocomplete failed");
                        StationSuggestions::default()
                    },
                    Err(_) => {
                        tracing::warn!("Station autocomplete timed out");
                        StationSuggestions::default()
                    },
                }
            },
            None => StationSuggestions::default(),
        };

        if self.autocomplete_seq.load(Ordering::SeqCst) != ticket {
            tracing::debug!(query, "Dropping superseded autocomplete result");
            return None;
        }
        Some(result)
    }

    /// Live running status for a train, with a fixed fallback string.
    pub async fn live_status(&self, train: &Train) -> LiveStatus {
        let fallback = LiveStatus {
            text: LIVE_STATUS_FALLBACK.to_string(),
            sources: Vec::new(),
        };

        let Some(client) = &self.client else {
            return fallback;
        };

        match tokio::time::timeout(
            self.timeout,
            queries::live_status(client, &train.number, &train.name),
        )
        .await
        {
            Ok(Ok(status)) => status,
            Ok(Err(error)) => {
                tracing::warn!(%error, "Live status unavailable");
                fallback
            },
            Err(_) => {
                tracing::warn!("Live status timed out");
                fallback
            },
        }
    }

    /// Short route tips, empty on failure.
    pub async fn route_tips(&self, origin: &str, destination: &str) -> String {
        let Some(client) = &self.client else {
            return String::new();
        };

        match tokio::time::timeout(self.timeout, queries::route_tips(client, origin, destination))
            .await
        {
            Ok(Ok(tips)) => tips,
            Ok(Err(error)) => {
                tracing::warn!(%error, "Route tips unavailable");
                String::new()
            },
            Err(_) => String::new(),
        }
    }

    /// Start a chat session, when a client is configured
    #[must_use]
    pub fn chat_session(&self) -> Option<ChatSession> {
        self.client.clone().map(ChatSession::new)
    }
}
