//! Application wiring: the booking store plus its collaborators.
//!
//! `BookingApp` owns the store and drives the legal step order the way the
//! UI does: search → selection → passengers → payment. The reducer itself
//! stays caller-trusted; this is the single caller.

use crate::booking::{BookingAction, BookingEnvironment, BookingReducer, BookingState};
use crate::catalog;
use crate::concierge::{Concierge, RECOMMENDATION_MIN_EVENTS};
use crate::config::Config;
use crate::analytics::FunnelMetrics;
use crate::payment::SimulatedGateway;
use crate::pnr::{Pnr, RandomPnrGenerator};
use crate::ticket::{self, TicketDocument};
use crate::types::{BookingStep, Passenger, PaymentMode, Train, TrainClass, User};
use railflow_assistant::{AssistantClient, UxRecommendation};
use railflow_core::environment::SystemClock;
use railflow_runtime::{Store, StoreError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// How long `pay` waits for the gateway before giving up
const PAYMENT_WAIT: Duration = Duration::from_secs(30);

/// Outcome of a payment attempt, surfaced to the UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Booking confirmed; the PNR is ready
    Confirmed {
        /// Assigned confirmation identifier
        pnr: Pnr,
    },
    /// Charge declined; the flow stays on the payment step
    Declined {
        /// Human-readable reason for display
        reason: String,
    },
}

/// The assembled booking application.
pub struct BookingApp {
    store: Store<BookingState, BookingAction, BookingEnvironment, BookingReducer>,
    concierge: Arc<Concierge>,
}

impl BookingApp {
    /// Assemble an app from an explicit environment and concierge
    #[must_use]
    pub fn new(environment: BookingEnvironment, concierge: Concierge) -> Self {
        Self {
            store: Store::new(BookingState::new(), BookingReducer::new(), environment),
            concierge: Arc::new(concierge),
        }
    }

    /// Assemble the production app from configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let environment = BookingEnvironment::new(
            Arc::new(SystemClock),
            Arc::new(RandomPnrGenerator),
            SimulatedGateway::new(config.payment.failure_rate).shared(),
        );

        let client = config.assistant.api_key.as_ref().map(|key| {
            let client = AssistantClient::new(key.clone());
            match &config.assistant.base_url {
                Some(base_url) => client.with_base_url(base_url.clone()),
                None => client,
            }
        });
        let concierge = Concierge::new(
            client,
            Duration::from_secs(config.assistant.request_timeout_secs),
        );

        Self::new(environment, concierge)
    }

    /// Sign in and land on the search screen
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is shutting down.
    pub async fn login(&self, user: User) -> Result<(), StoreError> {
        self.store.send(BookingAction::LogIn { user }).await
    }

    /// Search the catalog and move to the selection screen
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is shutting down.
    pub async fn search(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<&'static Train>, StoreError> {
        let results = catalog::search(origin, destination);
        self.store
            .send(BookingAction::NavigateTo {
                step: BookingStep::TrainSelection,
            })
            .await?;
        Ok(results)
    }

    /// Select a train and fare class; arms the seat lock
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is shutting down.
    pub async fn select(&self, train: Train, class: TrainClass) -> Result<(), StoreError> {
        self.store
            .send(BookingAction::SelectTrain { train, class })
            .await
    }

    /// Store the passenger list and continue to payment
    ///
    /// An empty list keeps the flow on the passenger screen: the payment step
    /// requires at least one passenger, and the reducer itself does not check.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is shutting down.
    pub async fn submit_passengers(&self, passengers: Vec<Passenger>) -> Result<(), StoreError> {
        let proceed = !passengers.is_empty();
        self.store
            .send(BookingAction::SetPassengers { passengers })
            .await?;
        if !proceed {
            return Ok(());
        }
        self.store
            .send(BookingAction::NavigateTo {
                step: BookingStep::Payment,
            })
            .await
    }

    /// Run the payment gateway and wait for its outcome
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] when the gateway outcome never arrives,
    /// or a shutdown error.
    pub async fn pay(&self, mode: PaymentMode) -> Result<PaymentOutcome, StoreError> {
        let outcome = self
            .store
            .send_and_wait_for(
                BookingAction::SubmitPayment { mode },
                |action| {
                    matches!(
                        action,
                        BookingAction::PaymentSucceeded { .. } | BookingAction::PaymentFailed { .. }
                    )
                },
                PAYMENT_WAIT,
            )
            .await?;

        match outcome {
            BookingAction::PaymentFailed { reason } => Ok(PaymentOutcome::Declined { reason }),
            _ => {
                let pnr = self
                    .store
                    .state(|s| s.pnr.clone())
                    .await
                    .unwrap_or_else(|| Pnr::new("RF000000000".to_string()));
                Ok(PaymentOutcome::Confirmed { pnr })
            },
        }
    }

    /// Abandon the current selection and return to search
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is shutting down.
    pub async fn reset(&self) -> Result<(), StoreError> {
        self.store.send(BookingAction::ResetBooking).await
    }

    /// Render the e-ticket for the confirmed booking, when one exists
    pub async fn eticket(&self) -> Option<TicketDocument> {
        self.store
            .state(|s| {
                match (&s.selected_train, &s.pnr) {
                    (Some(train), Some(pnr)) => Some(ticket::render(train, &s.passengers, pnr)),
                    _ => None,
                }
            })
            .await
    }

    /// Funnel metrics over the analytics log
    pub async fn metrics(&self) -> FunnelMetrics {
        self.store
            .state(|s| FunnelMetrics::from_events(&s.events))
            .await
    }

    /// UX recommendations, once the log carries enough traffic
    pub async fn recommendations(&self) -> Vec<UxRecommendation> {
        let (metrics, event_count) = self
            .store
            .state(|s| (FunnelMetrics::from_events(&s.events), s.events.len()))
            .await;

        if event_count < RECOMMENDATION_MIN_EVENTS {
            return Vec::new();
        }
        self.concierge.recommendations(&metrics).await
    }

    /// Seconds left on the seat lock, when one is armed
    pub async fn lock_remaining(&self) -> Option<u32> {
        self.store.state(|s| s.lock_timer).await
    }

    /// Snapshot of the full booking state
    pub async fn snapshot(&self) -> BookingState {
        self.store.state(Clone::clone).await
    }

    /// Observe actions produced by effects (lock ticks, expiry, gateway results)
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BookingAction> {
        self.store.subscribe_actions()
    }

    /// The assistant-facing service
    #[must_use]
    pub fn concierge(&self) -> &Concierge {
        &self.concierge
    }

    /// Gracefully stop effect execution
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] when effects outlive the timeout.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.store.shutdown(timeout).await
    }
}
