//! Item normalizer: picks the calendar day and time of day each item is
//! scheduled by.
//!
//! Each item kind carries one anchor datetime:
//!
//! | Kind | Anchor field |
//! |------|--------------|
//! | Flight | `departureTimeLocal` if parseable, else `departureDateTime` |
//! | Hotel | `checkIn` |
//! | Transportation | `pickupDateTime` |
//! | Attraction | `startDateTime` |
//!
//! UTC fields are read on the viewer's wall clock, given by the
//! [`Normalizer`]'s offset. Flight local-time strings are read in the offset
//! they encode, so a departure at `2025-11-13 23:30+04:00` stays on the 13th
//! whatever the viewer's offset.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc};

use crate::time::LocalStamp;
use crate::types::{Flight, TripItem};

/// Calendar date plus wall-clock time an item is scheduled at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Anchor {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Converts item timestamps into viewer-local calendar positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    offset: FixedOffset,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::utc()
    }
}

impl Normalizer {
    /// Read UTC fields as UTC wall-clock time.
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Read UTC fields at a fixed offset from UTC.
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Read UTC fields using the host's current local offset.
    pub fn host_local() -> Self {
        Self {
            offset: Local::now().offset().fix(),
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Viewer wall-clock reading of a UTC instant.
    pub fn local(&self, ts: &DateTime<Utc>) -> NaiveDateTime {
        ts.with_timezone(&self.offset).naive_local()
    }

    /// The calendar date and time of day an item is scheduled at.
    pub fn anchor(&self, item: &TripItem) -> Anchor {
        match item {
            TripItem::Flight(flight) => self.flight_departure(flight),
            TripItem::Hotel(hotel) => self.anchor_at(&hotel.check_in),
            TripItem::Transportation(ride) => self.anchor_at(&ride.pickup_date_time),
            TripItem::Attraction(attraction) => self.anchor_at(&attraction.start_date_time),
        }
    }

    /// The calendar day an item belongs to.
    pub fn anchor_date(&self, item: &TripItem) -> NaiveDate {
        self.anchor(item).date
    }

    /// Departure position of a flight, preferring its airport-local string.
    pub fn flight_departure(&self, flight: &Flight) -> Anchor {
        let fallback = self.anchor_at(&flight.departure_date_time);
        self.prefer_local(
            flight.departure_time_local.as_deref(),
            fallback,
            &flight.id,
            "departureTimeLocal",
        )
    }

    /// Arrival position of a flight, preferring its airport-local string.
    pub fn flight_arrival(&self, flight: &Flight) -> Anchor {
        let fallback = self.anchor_at(&flight.arrival_date_time);
        self.prefer_local(
            flight.arrival_time_local.as_deref(),
            fallback,
            &flight.id,
            "arrivalTimeLocal",
        )
    }

    fn anchor_at(&self, ts: &DateTime<Utc>) -> Anchor {
        let local = self.local(ts);
        Anchor {
            date: local.date(),
            time: local.time(),
        }
    }

    fn prefer_local(
        &self,
        local: Option<&str>,
        fallback: Anchor,
        item_id: &str,
        field: &'static str,
    ) -> Anchor {
        let Some(raw) = local.filter(|s| !s.trim().is_empty()) else {
            return fallback;
        };

        match LocalStamp::parse(raw) {
            Some(stamp) => Anchor {
                date: stamp.date,
                // A date-only reading keeps the viewer time for ordering
                time: stamp.time.unwrap_or(fallback.time),
            },
            None => {
                tracing::warn!(
                    item_id,
                    field,
                    value = raw,
                    "Unparseable local time, falling back to UTC field"
                );
                fallback
            }
        }
    }
}
