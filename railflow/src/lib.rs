//! RailFlow - a railway ticket booking demo.
//!
//! A single-session booking flow built on the RailFlow reducer architecture:
//!
//! - **Booking flow controller**: the one real state machine in the system.
//!   Owns the pipeline step, the selected train/class, the passenger list,
//!   the append-only analytics log, and the seat-lock countdown, driven as a
//!   chain of cancellable one-second delay effects.
//! - **Catalog**: static stations and trains with tolerant free-text search.
//! - **Payment simulator**: convenience fees by mode and a configurable
//!   failure rate, consumed by the controller as an async effect.
//! - **E-ticket renderer**: pure projection from a confirmed booking to a
//!   downloadable document.
//! - **Analytics**: funnel metrics over the event log.
//! - **Assistant**: LLM-backed chat, station autocomplete, live status,
//!   route tips, and UX recommendations, all degrading to empty/fallback
//!   results so they never gate the booking flow.
//!
//! # Seat lock
//!
//! ```text
//! SelectTrain ──▶ lock = 300 s, epoch += 1 ──▶ Delay(1s) tick chain
//!                                                   │
//!                        stale epoch / cleared lock ─┤ chain dies
//!                                                   ▼
//!                                            lock reaches 0
//!                                                   │
//!                              LockExpired (broadcast) ──▶ forced reset
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analytics;
pub mod app;
pub mod booking;
pub mod catalog;
pub mod concierge;
pub mod config;
pub mod payment;
pub mod pnr;
pub mod ticket;
pub mod types;

pub use analytics::FunnelMetrics;
pub use app::{BookingApp, PaymentOutcome};
pub use booking::{
    BookingAction, BookingEnvironment, BookingReducer, BookingState, SEAT_LOCK_SECONDS,
};
pub use concierge::Concierge;
pub use config::Config;
pub use payment::{PaymentGateway, SimulatedGateway};
pub use pnr::{Pnr, PnrGenerator, RandomPnrGenerator, SequencePnrGenerator};
pub use ticket::TicketDocument;
pub use types::*;
