//! Domain types for the RailFlow booking system.
//!
//! This module contains the value objects and entities shared across the
//! booking flow: steps, users, trains and fare classes, passengers, analytics
//! records, and money.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Booking pipeline
// ============================================================================

/// One step of the booking pipeline.
///
/// Conceptually ordered `Auth → Search → TrainSelection → Passengers →
/// Payment → Confirmation`; exactly one step is current at any time. The
/// derived ordering follows the pipeline order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStep {
    /// Sign-in screen
    Auth,
    /// Origin/destination search
    Search,
    /// Train and fare class selection
    TrainSelection,
    /// Passenger entry (seat lock running)
    Passengers,
    /// Payment screen
    Payment,
    /// Booking confirmed, e-ticket available
    Confirmation,
}

impl fmt::Display for BookingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Auth => "AUTH",
            Self::Search => "SEARCH",
            Self::TrainSelection => "TRAIN_SELECTION",
            Self::Passengers => "PASSENGERS",
            Self::Payment => "PAYMENT",
            Self::Confirmation => "CONFIRMATION",
        };
        write!(f, "{label}")
    }
}

/// Authenticated user for the session. Set once at `Auth`, immutable after.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
}

// ============================================================================
// Catalog entities
// ============================================================================

/// A train in the static catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Train {
    /// Catalog identifier
    pub id: String,
    /// Railway train number, e.g. `"12424"`
    pub number: String,
    /// Train name, e.g. `"Rajdhani Express"`
    pub name: String,
    /// Origin label including the bracketed station code
    pub origin: String,
    /// Destination label including the bracketed station code
    pub destination: String,
    /// Departure clock time, e.g. `"16:25"`
    pub departure: String,
    /// Arrival clock time
    pub arrival: String,
    /// Journey duration, e.g. `"15h 50m"`
    pub duration: String,
    /// Fare classes in display order
    pub classes: Vec<TrainClass>,
}

/// A priced seating category on a train.
///
/// `available` is a read-only snapshot; nothing in the booking flow decrements
/// it (no real inventory exists).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainClass {
    /// Class code, e.g. `"1A"`, `"SL"`, `"CC"`
    pub class_type: String,
    /// Fare per passenger
    pub price: Money,
    /// Seats shown as available
    pub available: u32,
}

// ============================================================================
// Passengers
// ============================================================================

/// Passenger gender as collected by the entry form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
    /// Other / undisclosed
    Other,
}

/// One passenger on the booking.
///
/// The core performs no validation beyond carrying the list; empty names and
/// implausible ages are a presentation-layer concern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Passenger name
    pub name: String,
    /// Age in years
    pub age: u8,
    /// Gender
    pub gender: Gender,
    /// Free-text seat preference, e.g. `"Lower"`, `"Window"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_preference: Option<String>,
}

// ============================================================================
// Analytics
// ============================================================================

/// One record in the append-only analytics log.
///
/// Exactly one record is appended per navigation; records are never deleted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// Step navigated to
    pub step: BookingStep,
    /// When the navigation happened
    pub timestamp: DateTime<Utc>,
    /// Optional payload attached by the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

// ============================================================================
// Payment modes
// ============================================================================

/// Payment mode offered by the gateway screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    /// UPI transfer (no convenience fee)
    Upi,
    /// Credit/debit card
    Card,
    /// Net banking
    NetBanking,
}

impl PaymentMode {
    /// Display label as shown on the payment screen
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upi => "UPI (PhonePe/GPay)",
            Self::Card => "Credit/Debit Card",
            Self::NetBanking => "Net Banking",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Money
// ============================================================================

/// An amount in whole rupees.
///
/// Fares in the catalog are whole-rupee amounts, so no sub-unit precision is
/// carried.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money(u64);

impl Money {
    /// Zero rupees
    pub const ZERO: Self = Self(0);

    /// Creates an amount from whole rupees
    #[must_use]
    pub const fn from_rupees(rupees: u64) -> Self {
        Self(rupees)
    }

    /// Amount in whole rupees
    #[must_use]
    pub const fn rupees(self) -> u64 {
        self.0
    }

    /// Adds two amounts, `None` on overflow
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(total) => Some(Self(total)),
            None => None,
        }
    }

    /// Adds two amounts, saturating at the numeric bound
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Multiplies by a quantity, `None` on overflow
    #[must_use]
    pub const fn checked_multiply(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(total) => Some(Self(total)),
            None => None,
        }
    }

    /// Multiplies by a quantity, saturating at the numeric bound
    #[must_use]
    pub const fn multiply(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{}", self.0)
    }
}
