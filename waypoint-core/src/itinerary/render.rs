//! Day renderer: turns a day's items into timeline rows.

use serde::Serialize;

use super::anchor::{Anchor, Normalizer};
use crate::format::format_amount;
use crate::types::{DaySchedule, ItemKind, TripItem};

/// One row of a day's timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub item_id: String,
    pub kind: ItemKind,
    /// Anchor time of day, `HH:MM`
    pub time: String,
    pub label: String,
    /// Price or cost when the item has a nonzero one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl TimelineEntry {
    /// Amount with two decimals, if any.
    pub fn amount_display(&self) -> Option<String> {
        self.amount.map(format_amount)
    }
}

/// Render one day: items sorted by anchor time, one entry each.
///
/// The sort is stable, so items at the same minute keep their schedule order.
pub fn render_day(day: &DaySchedule, normalizer: &Normalizer) -> Vec<TimelineEntry> {
    let mut rows: Vec<(Anchor, &TripItem)> = day
        .items
        .iter()
        .map(|item| (normalizer.anchor(item), item))
        .collect();
    rows.sort_by_key(|(anchor, _)| anchor.time);

    rows.into_iter()
        .map(|(anchor, item)| TimelineEntry {
            item_id: item.id().to_string(),
            kind: item.kind(),
            time: anchor.time.format("%H:%M").to_string(),
            label: item_label(item, normalizer),
            amount: item.listed_amount().filter(|amount| *amount != 0.0),
        })
        .collect()
}

/// Display line for an item.
pub fn item_label(item: &TripItem, normalizer: &Normalizer) -> String {
    match item {
        TripItem::Flight(flight) => {
            let arrival = normalizer.flight_arrival(flight);
            format!(
                "{} {}: {} → {} (arrives {})",
                flight.airline,
                flight.flight_number,
                flight.departure_airport.code,
                flight.arrival_airport.code,
                arrival.time.format("%H:%M")
            )
        }
        TripItem::Hotel(hotel) => format!("{} - Check-in", hotel.name),
        TripItem::Transportation(ride) => format!(
            "{}: {} → {}",
            ride.mode.display_name(),
            ride.pickup_location.label().unwrap_or("Pickup"),
            ride.dropoff_location.label().unwrap_or("Dropoff")
        ),
        TripItem::Attraction(attraction) => attraction.name.clone(),
    }
}
