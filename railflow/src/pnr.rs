//! Booking confirmation identifiers (PNR).
//!
//! A PNR is a cosmetic random numeric string shown to the user at
//! confirmation; uniqueness is neither guaranteed nor required. Generation is
//! behind a trait so tests get predictable values.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A Passenger Name Record identifier, e.g. `"RF482915306"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pnr(String);

impl Pnr {
    /// Wrap an already-formatted PNR string
    #[must_use]
    pub const fn new(value: String) -> Self {
        Self(value)
    }

    /// The PNR as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pnr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generates PNRs for confirmed bookings.
pub trait PnrGenerator: Send + Sync {
    /// Produce the next PNR
    fn generate(&self) -> Pnr;
}

/// Production generator: `RF` followed by nine random digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPnrGenerator;

impl PnrGenerator for RandomPnrGenerator {
    fn generate(&self) -> Pnr {
        let digits = rand::thread_rng().gen_range(100_000_000_u64..1_000_000_000);
        Pnr(format!("RF{digits}"))
    }
}

/// Deterministic generator for tests: `RF` + a counting sequence.
#[derive(Debug, Default)]
pub struct SequencePnrGenerator {
    next: AtomicU64,
}

impl SequencePnrGenerator {
    /// Create a generator counting from zero
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }
}

impl PnrGenerator for SequencePnrGenerator {
    fn generate(&self) -> Pnr {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        Pnr(format!("RF{:09}", 100_000_000 + n))
    }
}
