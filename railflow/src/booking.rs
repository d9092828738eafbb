//! Booking flow controller.
//!
//! Owns the booking step, the selected train and fare class, the passenger
//! list, the seat-lock countdown, and the append-only analytics log. This is
//! the only stateful machine in the system; everything else (catalog, payment
//! gateway, ticket rendering, assistant) is a collaborator.
//!
//! # Seat lock
//!
//! Selecting a train arms a 300-second provisional hold. The countdown is a
//! chain of one-second `Effect::Delay` ticks carrying the lock epoch at which
//! they were armed. Re-arming bumps the epoch, so ticks from a superseded
//! chain arrive stale and die; clearing the lock (reset, confirmation) starves
//! the chain the same way. At zero the reducer feeds back [`BookingAction::LockExpired`],
//! which observers see on the store broadcast before the forced reset lands.
//!
//! Step transitions are deliberately unguarded: the controller trusts its
//! caller and any step is reachable from any step, as the booking UI needs
//! for back-navigation.

use crate::payment::{PaymentGateway, convenience_fee};
use crate::pnr::{Pnr, PnrGenerator};
use crate::types::{
    AnalyticsEvent, BookingStep, Money, Passenger, PaymentMode, Train, TrainClass, User,
};
use railflow_core::{
    SmallVec, effect::Effect, environment::Clock, reducer::Reducer, smallvec,
};
use std::sync::Arc;
use std::time::Duration;

/// Seconds a selected fare class is provisionally held
pub const SEAT_LOCK_SECONDS: u32 = 300;

// ============================================================================
// State
// ============================================================================

/// Booking session state.
#[derive(Clone, Debug, PartialEq)]
pub struct BookingState {
    /// Current pipeline step
    pub step: BookingStep,
    /// Authenticated user, set at `Auth`
    pub user: Option<User>,
    /// Train chosen on the selection screen
    pub selected_train: Option<Train>,
    /// Fare class chosen on the selection screen
    pub selected_class: Option<TrainClass>,
    /// Passengers entered so far
    pub passengers: Vec<Passenger>,
    /// Append-only analytics log, one record per navigation
    pub events: Vec<AnalyticsEvent>,
    /// Seconds remaining on the seat lock, `None` when no hold exists
    pub lock_timer: Option<u32>,
    /// Monotonic arm counter; ticks from older epochs are stale
    pub lock_epoch: u64,
    /// Confirmation identifier, assigned on entering `Confirmation`
    pub pnr: Option<Pnr>,
    /// Reason the last payment attempt failed, for display and retry
    pub payment_error: Option<String>,
}

impl BookingState {
    /// Fresh session at the sign-in step
    #[must_use]
    pub const fn new() -> Self {
        Self {
            step: BookingStep::Auth,
            user: None,
            selected_train: None,
            selected_class: None,
            passengers: Vec::new(),
            events: Vec::new(),
            lock_timer: None,
            lock_epoch: 0,
            pnr: None,
            payment_error: None,
        }
    }
}

impl Default for BookingState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Actions for the booking flow.
///
/// Commands come from the UI layer; the remaining variants are fed back by
/// effects (gateway outcome, lock ticks and expiry).
#[derive(Clone, Debug)]
pub enum BookingAction {
    // Commands
    /// Sign the user in and move to the search screen
    LogIn {
        /// The authenticated user
        user: User,
    },

    /// Jump to a step (caller-trusted, appends one analytics record)
    NavigateTo {
        /// Target step
        step: BookingStep,
    },

    /// Choose a train and fare class; arms the seat lock
    SelectTrain {
        /// Train from the catalog
        train: Train,
        /// Fare class on that train
        class: TrainClass,
    },

    /// Replace the passenger list wholesale
    SetPassengers {
        /// New passenger list
        passengers: Vec<Passenger>,
    },

    /// Run the payment gateway for the current selection
    SubmitPayment {
        /// Payment mode chosen on the gateway screen
        mode: PaymentMode,
    },

    /// Abandon the current selection and return to search
    ResetBooking,

    // Effect feedback
    /// One second of the seat lock elapsed
    LockTick {
        /// Epoch the tick chain was armed at
        epoch: u64,
    },

    /// The seat lock ran out; forces a reset
    LockExpired,

    /// Gateway approved the charge
    PaymentSucceeded {
        /// Amount actually charged
        amount: Money,
        /// Mode used
        mode: PaymentMode,
    },

    /// Gateway declined the charge
    PaymentFailed {
        /// Human-readable reason, shown for retry
        reason: String,
    },
}

// ============================================================================
// Environment
// ============================================================================

/// Environment dependencies for the booking flow
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Clock for analytics timestamps
    pub clock: Arc<dyn Clock>,
    /// PNR generator used at confirmation
    pub pnr: Arc<dyn PnrGenerator>,
    /// Payment gateway run by `SubmitPayment`
    pub gateway: Arc<dyn PaymentGateway>,
}

impl BookingEnvironment {
    /// Creates a new `BookingEnvironment`
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        pnr: Arc<dyn PnrGenerator>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            clock,
            pnr,
            gateway,
        }
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the booking flow.
#[derive(Clone, Debug, Default)]
pub struct BookingReducer;

impl BookingReducer {
    /// Creates a new `BookingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Set the step and append the analytics record for it.
    ///
    /// Every navigation goes through here, so the log stays one record per
    /// transition.
    fn navigate(state: &mut BookingState, step: BookingStep, env: &BookingEnvironment) {
        state.step = step;
        state.events.push(AnalyticsEvent {
            step,
            timestamp: env.clock.now(),
            data: None,
        });
    }

    /// Enter `Confirmation`: release the hold, assign the PNR, log the step.
    fn enter_confirmation(state: &mut BookingState, env: &BookingEnvironment) {
        state.lock_timer = None;
        state.pnr = Some(env.pnr.generate());
        Self::navigate(state, BookingStep::Confirmation, env);
    }

    /// Restore booking state to a clean search screen.
    ///
    /// Deliberately does not log an analytics record: the reset is a state
    /// restore, not a navigation, which keeps `ResetBooking` idempotent. The
    /// user and the analytics log survive for the life of the session.
    fn clear_booking(state: &mut BookingState) {
        state.step = BookingStep::Search;
        state.selected_train = None;
        state.selected_class = None;
        state.passengers.clear();
        state.lock_timer = None;
        state.pnr = None;
        state.payment_error = None;
    }

    /// The next one-second tick of the current lock chain
    fn schedule_tick(epoch: u64) -> Effect<BookingAction> {
        Effect::Delay {
            duration: Duration::from_secs(1),
            action: Box::new(BookingAction::LockTick { epoch }),
        }
    }
}

impl Reducer for BookingReducer {
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            BookingAction::LogIn { user } => {
                state.user = Some(user);
                Self::navigate(state, BookingStep::Search, env);
                SmallVec::new()
            },

            BookingAction::NavigateTo { step } => {
                if step == BookingStep::Confirmation {
                    Self::enter_confirmation(state, env);
                } else {
                    Self::navigate(state, step, env);
                }
                SmallVec::new()
            },

            BookingAction::SelectTrain { train, class } => {
                state.selected_train = Some(train);
                state.selected_class = Some(class);
                state.lock_epoch += 1;
                state.lock_timer = Some(SEAT_LOCK_SECONDS);
                state.pnr = None;
                state.payment_error = None;
                Self::navigate(state, BookingStep::Passengers, env);

                // Arming always starts a fresh chain; the epoch bump above
                // already invalidated any previous one
                smallvec![Self::schedule_tick(state.lock_epoch)]
            },

            BookingAction::SetPassengers { passengers } => {
                state.passengers = passengers;
                SmallVec::new()
            },

            BookingAction::SubmitPayment { mode } => {
                let Some(class) = state.selected_class.as_ref() else {
                    state.payment_error = Some("No fare class selected".to_string());
                    return SmallVec::new();
                };

                #[allow(clippy::cast_possible_truncation)]
                let seats = state.passengers.len().max(1) as u32;
                let fare = class.price.multiply(seats);
                let total = fare.saturating_add(convenience_fee(mode, fare));

                state.payment_error = None;

                let gateway = Arc::clone(&env.gateway);
                smallvec![Effect::Future(Box::pin(async move {
                    match gateway.charge(total, mode).await {
                        Ok(receipt) => Some(BookingAction::PaymentSucceeded {
                            amount: receipt.amount,
                            mode: receipt.mode,
                        }),
                        Err(error) => Some(BookingAction::PaymentFailed {
                            reason: error.to_string(),
                        }),
                    }
                }))]
            },

            BookingAction::ResetBooking => {
                Self::clear_booking(state);
                SmallVec::new()
            },

            BookingAction::LockTick { epoch } => {
                // Ticks from a superseded or cleared chain die here; this is
                // the cancellation point for re-arm, reset, and confirmation
                if epoch != state.lock_epoch {
                    return SmallVec::new();
                }
                let Some(remaining) = state.lock_timer else {
                    return SmallVec::new();
                };

                let next = remaining.saturating_sub(1);
                state.lock_timer = Some(next);

                if next > 0 {
                    smallvec![Self::schedule_tick(epoch)]
                } else {
                    // Notify observers, then reset via the fed-back action
                    smallvec![Effect::Future(Box::pin(async {
                        Some(BookingAction::LockExpired)
                    }))]
                }
            },

            BookingAction::LockExpired => {
                tracing::info!("Seat lock expired, abandoning reservation");
                Self::clear_booking(state);
                SmallVec::new()
            },

            BookingAction::PaymentSucceeded { amount, mode } => {
                tracing::info!(%amount, ?mode, "Payment captured");
                state.payment_error = None;
                Self::enter_confirmation(state, env);
                SmallVec::new()
            },

            BookingAction::PaymentFailed { reason } => {
                state.payment_error = Some(reason);
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::payment::SimulatedGateway;
    use crate::pnr::SequencePnrGenerator;
    use proptest::prelude::*;
    use railflow_testing::{ReducerTest, assertions, test_clock};

    fn test_env() -> BookingEnvironment {
        BookingEnvironment::new(
            Arc::new(test_clock()),
            Arc::new(SequencePnrGenerator::new()),
            SimulatedGateway::always_succeeds().shared(),
        )
    }

    fn sample_train() -> Train {
        catalog::all_trains()[0].clone()
    }

    fn sample_class() -> TrainClass {
        sample_train().classes[1].clone() // 2A @ ₹2800
    }

    fn jane() -> User {
        User {
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
        }
    }

    fn passenger(name: &str) -> Passenger {
        Passenger {
            name: name.to_string(),
            age: 34,
            gender: crate::types::Gender::Female,
            seat_preference: Some("Lower".to_string()),
        }
    }

    /// Drive a sequence of actions through a fresh reducer and return the state
    fn run(actions: Vec<BookingAction>) -> BookingState {
        let reducer = BookingReducer::new();
        let env = test_env();
        let mut state = BookingState::new();
        for action in actions {
            reducer.reduce(&mut state, action, &env);
        }
        state
    }

    #[test]
    fn test_login_navigates_to_search() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new())
            .when_action(BookingAction::LogIn { user: jane() })
            .then_state(|state| {
                assert_eq!(state.step, BookingStep::Search);
                assert_eq!(state.user.as_ref().unwrap().name, "Jane");
                assert_eq!(state.events.len(), 1);
                assert_eq!(state.events[0].step, BookingStep::Search);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_navigate_appends_one_event_per_call() {
        let state = run(vec![
            BookingAction::NavigateTo {
                step: BookingStep::Search,
            },
            BookingAction::NavigateTo {
                step: BookingStep::TrainSelection,
            },
            BookingAction::NavigateTo {
                step: BookingStep::Search,
            },
        ]);

        assert_eq!(state.events.len(), 3);
        let steps: Vec<BookingStep> = state.events.iter().map(|e| e.step).collect();
        assert_eq!(
            steps,
            vec![
                BookingStep::Search,
                BookingStep::TrainSelection,
                BookingStep::Search
            ]
        );
    }

    #[test]
    fn test_select_train_arms_lock() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_env())
            .given_state(BookingState::new())
            .when_action(BookingAction::SelectTrain {
                train: sample_train(),
                class: sample_class(),
            })
            .then_state(|state| {
                assert_eq!(state.step, BookingStep::Passengers);
                assert_eq!(state.lock_timer, Some(SEAT_LOCK_SECONDS));
                assert_eq!(state.lock_epoch, 1);
                assert!(state.selected_train.is_some());
                assert!(state.selected_class.is_some());
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_delay_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_select_train_rearms_regardless_of_prior_state() {
        let reducer = BookingReducer::new();
        let env = test_env();
        let mut state = BookingState::new();

        reducer.reduce(
            &mut state,
            BookingAction::SelectTrain {
                train: sample_train(),
                class: sample_class(),
            },
            &env,
        );
        // Let some time burn off
        for _ in 0..40 {
            reducer.reduce(&mut state, BookingAction::LockTick { epoch: 1 }, &env);
        }
        assert_eq!(state.lock_timer, Some(260));

        // Re-arm resets the countdown and bumps the epoch
        reducer.reduce(
            &mut state,
            BookingAction::SelectTrain {
                train: sample_train(),
                class: sample_class(),
            },
            &env,
        );
        assert_eq!(state.lock_timer, Some(SEAT_LOCK_SECONDS));
        assert_eq!(state.lock_epoch, 2);

        // Ticks from the superseded chain no longer decrement
        let effects = reducer.reduce(&mut state, BookingAction::LockTick { epoch: 1 }, &env);
        assert_eq!(state.lock_timer, Some(SEAT_LOCK_SECONDS));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_lock_tick_decrements_and_reschedules() {
        let reducer = BookingReducer::new();
        let env = test_env();
        let mut state = BookingState::new();
        reducer.reduce(
            &mut state,
            BookingAction::SelectTrain {
                train: sample_train(),
                class: sample_class(),
            },
            &env,
        );

        let effects = reducer.reduce(&mut state, BookingAction::LockTick { epoch: 1 }, &env);
        assert_eq!(state.lock_timer, Some(299));
        assertions::assert_has_delay_effect(&effects);
    }

    #[test]
    fn test_tick_without_lock_is_inert() {
        let reducer = BookingReducer::new();
        let env = test_env();
        let mut state = BookingState::new();

        let effects = reducer.reduce(&mut state, BookingAction::LockTick { epoch: 0 }, &env);
        assert!(effects.is_empty());
        assert_eq!(state.lock_timer, None);
    }

    #[test]
    fn test_final_tick_emits_expiry() {
        let reducer = BookingReducer::new();
        let env = test_env();
        let mut state = BookingState::new();
        reducer.reduce(
            &mut state,
            BookingAction::SelectTrain {
                train: sample_train(),
                class: sample_class(),
            },
            &env,
        );
        state.lock_timer = Some(1);

        let effects = reducer.reduce(&mut state, BookingAction::LockTick { epoch: 1 }, &env);
        assert_eq!(state.lock_timer, Some(0));
        assertions::assert_has_future_effect(&effects);
    }

    #[test]
    fn test_expiry_scenario_full_countdown() {
        // Login, select, let all 300 seconds elapse: forced reset back to
        // Search with the selection abandoned, and exactly the two analytics
        // records from login and selection (the reset is silent)
        let reducer = BookingReducer::new();
        let env = test_env();
        let mut state = BookingState::new();

        reducer.reduce(&mut state, BookingAction::LogIn { user: jane() }, &env);
        reducer.reduce(
            &mut state,
            BookingAction::SelectTrain {
                train: sample_train(),
                class: sample_class(),
            },
            &env,
        );
        assert_eq!(state.lock_timer, Some(300));
        assert_eq!(state.events.len(), 2);

        let mut expiry_seen = false;
        for _ in 0..SEAT_LOCK_SECONDS {
            let effects = reducer.reduce(&mut state, BookingAction::LockTick { epoch: 1 }, &env);
            if effects
                .iter()
                .any(|e| matches!(e, Effect::Future(_)))
            {
                expiry_seen = true;
                reducer.reduce(&mut state, BookingAction::LockExpired, &env);
            }
        }

        assert!(expiry_seen, "300 ticks must reach expiry");
        assert_eq!(state.step, BookingStep::Search);
        assert_eq!(state.selected_train, None);
        assert_eq!(state.selected_class, None);
        assert!(state.passengers.is_empty());
        assert_eq!(state.lock_timer, None);
        assert_eq!(state.events.len(), 2);
        assert!(state.user.is_some(), "user survives expiry");
    }

    #[test]
    fn test_reset_booking_is_idempotent() {
        let reducer = BookingReducer::new();
        let env = test_env();

        let mut once = run(vec![
            BookingAction::LogIn { user: jane() },
            BookingAction::SelectTrain {
                train: sample_train(),
                class: sample_class(),
            },
            BookingAction::SetPassengers {
                passengers: vec![passenger("Jane")],
            },
        ]);
        reducer.reduce(&mut once, BookingAction::ResetBooking, &env);

        let mut twice = once.clone();
        reducer.reduce(&mut twice, BookingAction::ResetBooking, &env);

        assert_eq!(once, twice);
        assert_eq!(once.step, BookingStep::Search);
        assert!(once.user.is_some());
    }

    #[test]
    fn test_confirmation_clears_lock_and_assigns_pnr() {
        let state = run(vec![
            BookingAction::LogIn { user: jane() },
            BookingAction::SelectTrain {
                train: sample_train(),
                class: sample_class(),
            },
            BookingAction::NavigateTo {
                step: BookingStep::Confirmation,
            },
        ]);

        assert_eq!(state.step, BookingStep::Confirmation);
        assert_eq!(state.lock_timer, None);
        assert_eq!(state.pnr.as_ref().unwrap().as_str(), "RF100000000");
    }

    #[test]
    fn test_submit_payment_runs_gateway_effect() {
        let reducer = BookingReducer::new();
        let env = test_env();
        let mut state = run(vec![
            BookingAction::SelectTrain {
                train: sample_train(),
                class: sample_class(),
            },
            BookingAction::SetPassengers {
                passengers: vec![passenger("Jane"), passenger("Asha")],
            },
        ]);

        let effects = reducer.reduce(
            &mut state,
            BookingAction::SubmitPayment {
                mode: PaymentMode::Upi,
            },
            &env,
        );
        assertions::assert_has_future_effect(&effects);
        assert_eq!(state.payment_error, None);
    }

    #[test]
    fn test_submit_payment_without_selection_records_error() {
        let reducer = BookingReducer::new();
        let env = test_env();
        let mut state = BookingState::new();

        let effects = reducer.reduce(
            &mut state,
            BookingAction::SubmitPayment {
                mode: PaymentMode::Card,
            },
            &env,
        );
        assert!(effects.is_empty());
        assert_eq!(
            state.payment_error.as_deref(),
            Some("No fare class selected")
        );
    }

    #[test]
    fn test_payment_failure_keeps_step_for_retry() {
        let state = run(vec![
            BookingAction::LogIn { user: jane() },
            BookingAction::SelectTrain {
                train: sample_train(),
                class: sample_class(),
            },
            BookingAction::NavigateTo {
                step: BookingStep::Payment,
            },
            BookingAction::PaymentFailed {
                reason: "Payment timed out. Please check your bank and retry.".to_string(),
            },
        ]);

        assert_eq!(state.step, BookingStep::Payment);
        assert_eq!(
            state.payment_error.as_deref(),
            Some("Payment timed out. Please check your bank and retry.")
        );
        assert!(state.lock_timer.is_some(), "hold survives a failed payment");
    }

    #[test]
    fn test_payment_success_enters_confirmation() {
        let state = run(vec![
            BookingAction::LogIn { user: jane() },
            BookingAction::SelectTrain {
                train: sample_train(),
                class: sample_class(),
            },
            BookingAction::NavigateTo {
                step: BookingStep::Payment,
            },
            BookingAction::PaymentSucceeded {
                amount: Money::from_rupees(2800),
                mode: PaymentMode::Upi,
            },
        ]);

        assert_eq!(state.step, BookingStep::Confirmation);
        assert_eq!(state.lock_timer, None);
        assert!(state.pnr.is_some());
        let steps: Vec<BookingStep> = state.events.iter().map(|e| e.step).collect();
        assert_eq!(
            steps,
            vec![
                BookingStep::Search,
                BookingStep::Passengers,
                BookingStep::Payment,
                BookingStep::Confirmation
            ]
        );
    }

    proptest! {
        /// The analytics log mirrors every navigation, in order
        #[test]
        fn prop_analytics_log_mirrors_navigations(steps in proptest::collection::vec(0..6usize, 0..40)) {
            let all = [
                BookingStep::Auth,
                BookingStep::Search,
                BookingStep::TrainSelection,
                BookingStep::Passengers,
                BookingStep::Payment,
                BookingStep::Confirmation,
            ];
            let reducer = BookingReducer::new();
            let env = test_env();
            let mut state = BookingState::new();

            for &index in &steps {
                reducer.reduce(
                    &mut state,
                    BookingAction::NavigateTo { step: all[index] },
                    &env,
                );
            }

            prop_assert_eq!(state.events.len(), steps.len());
            for (event, &index) in state.events.iter().zip(steps.iter()) {
                prop_assert_eq!(event.step, all[index]);
            }
        }
    }
}
