//! Booking funnel metrics computed from the analytics log.
//!
//! A pure read model over the append-only event log: per-step traffic counts,
//! funnel conversion, and completion timing. The JSON form feeds the
//! assistant's UX-recommendation prompt.

use crate::types::{AnalyticsEvent, BookingStep};
use serde::Serialize;
use std::collections::BTreeMap;

/// Funnel display order, search through confirmation.
pub const FUNNEL_STEPS: [BookingStep; 5] = [
    BookingStep::Search,
    BookingStep::TrainSelection,
    BookingStep::Passengers,
    BookingStep::Payment,
    BookingStep::Confirmation,
];

/// Aggregated booking funnel metrics.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FunnelMetrics {
    /// Navigation count per step
    pub step_counts: BTreeMap<BookingStep, usize>,
    /// Completed bookings (confirmations)
    pub total_bookings: usize,
    /// Confirmations per search, 0.0 when no searches happened
    pub conversion_rate: f64,
    /// Mean seconds from a search to the next confirmation, when any booking
    /// completed
    pub average_completion_seconds: Option<f64>,
}

impl FunnelMetrics {
    /// Compute metrics over the analytics log.
    #[must_use]
    pub fn from_events(events: &[AnalyticsEvent]) -> Self {
        let mut step_counts: BTreeMap<BookingStep, usize> = BTreeMap::new();
        for event in events {
            *step_counts.entry(event.step).or_insert(0) += 1;
        }

        let searches = step_counts.get(&BookingStep::Search).copied().unwrap_or(0);
        let total_bookings = step_counts
            .get(&BookingStep::Confirmation)
            .copied()
            .unwrap_or(0);

        #[allow(clippy::cast_precision_loss)] // Display-grade ratio
        let conversion_rate = if searches == 0 {
            0.0
        } else {
            total_bookings as f64 / searches as f64
        };

        let average_completion_seconds = Self::average_completion(events);

        Self {
            step_counts,
            total_bookings,
            conversion_rate,
            average_completion_seconds,
        }
    }

    /// Mean duration from each search to the next confirmation after it.
    fn average_completion(events: &[AnalyticsEvent]) -> Option<f64> {
        let mut durations = Vec::new();
        let mut search_started_at = None;

        for event in events {
            match event.step {
                BookingStep::Search => {
                    // A later search restarts the funnel measurement
                    search_started_at = Some(event.timestamp);
                },
                BookingStep::Confirmation => {
                    if let Some(start) = search_started_at.take() {
                        let elapsed = (event.timestamp - start).num_milliseconds();
                        #[allow(clippy::cast_precision_loss)] // Display-grade mean
                        durations.push(elapsed as f64 / 1000.0);
                    }
                },
                _ => {},
            }
        }

        if durations.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)] // Display-grade mean
        let mean = durations.iter().sum::<f64>() / durations.len() as f64;
        Some(mean)
    }

    /// Count for one step, zero when it never occurred
    #[must_use]
    pub fn count(&self, step: BookingStep) -> usize {
        self.step_counts.get(&step).copied().unwrap_or(0)
    }

    /// Funnel counts in display order
    #[must_use]
    pub fn funnel(&self) -> Vec<(BookingStep, usize)> {
        FUNNEL_STEPS
            .iter()
            .map(|&step| (step, self.count(step)))
            .collect()
    }

    /// JSON value embedded in the assistant's recommendation prompt.
    ///
    /// Serializes the step counts keyed by wire step names
    /// (`"SEARCH"`, `"TRAIN_SELECTION"`, ...).
    #[must_use]
    pub fn to_prompt_value(&self) -> serde_json::Value {
        serde_json::to_value(&self.step_counts).unwrap_or_default()
    }
}
