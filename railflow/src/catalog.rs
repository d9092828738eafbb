//! Static station and train catalog with free-text search.
//!
//! The catalog is a fixed snapshot; a real deployment would source it from a
//! reservation backend. Search tolerates the ways users actually type station
//! names: substring matches on the label, typing the full label when the
//! catalog shows only the city, and bare station codes.

use crate::types::{Money, Train, TrainClass};
use std::sync::LazyLock;

/// Stations offered by the search form, labelled `"Name (CODE)"`.
pub const STATIONS: [&str; 13] = [
    "New Delhi (NDLS)",
    "Mumbai Central (MMCT)",
    "Howrah Junction (HWH)",
    "Chennai Central (MAS)",
    "Bengaluru City (SBC)",
    "Ahmedabad Junction (ADI)",
    "Pune Junction (PUNE)",
    "Jaipur Junction (JP)",
    "Coimbatore Junction (CBE)",
    "Tirunelveli Junction (TEN)",
    "Erode Junction (ED)",
    "Tiruppur (TUP)",
    "Salem Junction (SA)",
];

fn class(class_type: &str, price: u64, available: u32) -> TrainClass {
    TrainClass {
        class_type: class_type.to_string(),
        price: Money::from_rupees(price),
        available,
    }
}

#[allow(clippy::too_many_lines)] // Catalog data
fn build_catalog() -> Vec<Train> {
    vec![
        Train {
            id: "1".to_string(),
            number: "12424".to_string(),
            name: "Rajdhani Express".to_string(),
            origin: "New Delhi (NDLS)".to_string(),
            destination: "Mumbai Central (MMCT)".to_string(),
            departure: "16:25".to_string(),
            arrival: "08:15".to_string(),
            duration: "15h 50m".to_string(),
            classes: vec![class("1A", 4500, 4), class("2A", 2800, 12), class("3A", 1900, 45)],
        },
        Train {
            id: "4".to_string(),
            number: "20643".to_string(),
            name: "Vande Bharat Express".to_string(),
            origin: "Coimbatore Junction (CBE)".to_string(),
            destination: "Tirunelveli Junction (TEN)".to_string(),
            departure: "06:00".to_string(),
            arrival: "12:00".to_string(),
            duration: "6h 00m".to_string(),
            classes: vec![class("EC", 2100, 15), class("CC", 1100, 140)],
        },
        Train {
            id: "6".to_string(),
            number: "12674".to_string(),
            name: "Cheran SF Express".to_string(),
            origin: "Coimbatore Junction (CBE)".to_string(),
            destination: "Erode Junction (ED)".to_string(),
            departure: "22:50".to_string(),
            arrival: "00:20".to_string(),
            duration: "1h 30m".to_string(),
            classes: vec![
                class("1A", 1200, 2),
                class("2A", 750, 10),
                class("3A", 550, 40),
                class("SL", 175, 150),
            ],
        },
        Train {
            id: "7".to_string(),
            number: "12676".to_string(),
            name: "Kovai SF Express".to_string(),
            origin: "Coimbatore Junction (CBE)".to_string(),
            destination: "Chennai Central (MAS)".to_string(),
            departure: "15:15".to_string(),
            arrival: "22:50".to_string(),
            duration: "7h 35m".to_string(),
            classes: vec![class("CC", 650, 85), class("2S", 195, 210)],
        },
        Train {
            id: "8".to_string(),
            number: "12672".to_string(),
            name: "Nilgiri Express".to_string(),
            origin: "Coimbatore Junction (CBE)".to_string(),
            destination: "Erode Junction (ED)".to_string(),
            departure: "21:20".to_string(),
            arrival: "22:55".to_string(),
            duration: "1h 35m".to_string(),
            classes: vec![class("1A", 1250, 4), class("2A", 710, 15), class("SL", 145, 80)],
        },
        Train {
            id: "2".to_string(),
            number: "12002".to_string(),
            name: "Shatabdi Express".to_string(),
            origin: "New Delhi (NDLS)".to_string(),
            destination: "Jaipur Junction (JP)".to_string(),
            departure: "06:10".to_string(),
            arrival: "10:45".to_string(),
            duration: "4h 35m".to_string(),
            classes: vec![class("EC", 1800, 8), class("CC", 950, 110)],
        },
    ]
}

static TRAINS: LazyLock<Vec<Train>> = LazyLock::new(build_catalog);

/// The full train catalog
#[must_use]
pub fn all_trains() -> &'static [Train] {
    &TRAINS
}

/// Extract the bracketed station code from a label, lowercased.
///
/// Falls back to the whole label when no brackets are present, so bare codes
/// typed by the user compare against themselves.
fn extract_code(label: &str) -> String {
    label
        .find('(')
        .and_then(|open| {
            label[open + 1..]
                .find(')')
                .map(|close| &label[open + 1..open + 1 + close])
        })
        .unwrap_or(label)
        .trim()
        .to_lowercase()
}

/// Whether a typed query matches a catalog station label.
///
/// Case-insensitive; accepts a substring of the label, a query that contains
/// the label's first word (users pasting the full suggestion), or an exact
/// station-code match.
fn matches_station(label: &str, query: &str) -> bool {
    let label_lower = label.to_lowercase();
    let query_lower = query.trim().to_lowercase();
    if query_lower.is_empty() {
        return false;
    }

    let label_code = extract_code(&label_lower);
    let query_code = extract_code(&query_lower);

    label_lower.contains(&query_lower)
        || label_lower
            .split_whitespace()
            .next()
            .is_some_and(|first_word| query_lower.contains(first_word))
        || label_code == query_code
}

/// Search the catalog by free-text origin and destination.
#[must_use]
pub fn search(origin_query: &str, destination_query: &str) -> Vec<&'static Train> {
    all_trains()
        .iter()
        .filter(|train| {
            matches_station(&train.origin, origin_query)
                && matches_station(&train.destination, destination_query)
        })
        .collect()
}
