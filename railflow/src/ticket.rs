//! E-ticket rendering.
//!
//! A pure projection from the confirmed booking to a downloadable document.
//! Rendering has no feedback into booking state.

use crate::pnr::Pnr;
use crate::types::{Passenger, Train};
use std::fmt::Write as _;

const PAGE_WIDTH: usize = 72;

/// A rendered e-ticket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicketDocument {
    text: String,
}

impl TicketDocument {
    /// The rendered document as text
    #[must_use]
    pub fn as_text(&self) -> &str {
        &self.text
    }

    /// The document as downloadable bytes
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.text.into_bytes()
    }
}

fn rule(out: &mut String, ch: char) {
    for _ in 0..PAGE_WIDTH {
        out.push(ch);
    }
    out.push('\n');
}

fn line(out: &mut String, content: &str) {
    let _ = writeln!(out, "{content}");
}

/// Render the e-ticket for a confirmed booking.
///
/// Layout mirrors the printed ticket: brand header, PNR block, journey
/// summary, passenger table, footer note.
#[must_use]
pub fn render(train: &Train, passengers: &[Passenger], pnr: &Pnr) -> TicketDocument {
    let mut out = String::new();

    rule(&mut out, '=');
    line(&mut out, "RailFlow E-Ticket");
    line(&mut out, "Your Seamless Rail Journey Partner");
    rule(&mut out, '=');

    line(&mut out, "PNR NUMBER");
    line(&mut out, pnr.as_str());
    rule(&mut out, '-');

    line(
        &mut out,
        &format!("{} {} ({})", train.number, train.name, train.duration),
    );
    line(
        &mut out,
        &format!("{}  ->  {}", train.origin, train.destination),
    );
    line(
        &mut out,
        &format!("Departs {}   Arrives {}", train.departure, train.arrival),
    );
    rule(&mut out, '-');

    line(&mut out, "PASSENGERS");
    for (index, passenger) in passengers.iter().enumerate() {
        let preference = passenger.seat_preference.as_deref().unwrap_or("No preference");
        line(
            &mut out,
            &format!(
                "{:>2}. {}  (age {}, {:?}, {})",
                index + 1,
                passenger.name,
                passenger.age,
                passenger.gender,
                preference
            ),
        );
    }
    rule(&mut out, '-');

    line(
        &mut out,
        "Carry a valid photo ID. Arrive 30 minutes before departure.",
    );
    rule(&mut out, '=');

    TicketDocument { text: out }
}
