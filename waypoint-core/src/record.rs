//! Trip records: the JSON shape trips are exchanged in.
//!
//! A record stores dates as strings and items as loose JSON. Converting a
//! record into a [`Trip`] decodes items one at a time; an item that fails to
//! decode (missing or unparseable anchor datetime, wrong shape) is logged and
//! skipped rather than failing the whole trip. Skipped entries, and entries
//! dated outside the trip, ride along on the trip as [`UnscheduledItems`] and
//! are written back unchanged.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::itinerary::schedule::{build_schedule, fill_missing_days};
use crate::itinerary::Normalizer;
use crate::time::{format_timestamp, parse_date, parse_timestamp};
use crate::types::{
    Attraction, DaySchedule, Flight, Hotel, ItemCollections, Transportation, Trip, TripItem,
    TripStatus,
};

/// Raw trip as stored or sent by the trip service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub destinations: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<DayRecord>>,
    #[serde(default)]
    pub flights: Vec<Value>,
    #[serde(default)]
    pub hotels: Vec<Value>,
    #[serde(default)]
    pub transportation: Vec<Value>,
    #[serde(default)]
    pub attractions: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Raw collection entries that are kept with a trip but are not on its
/// schedule: entries that do not decode and entries dated outside the trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnscheduledItems {
    pub flights: Vec<Value>,
    pub hotels: Vec<Value>,
    pub transportation: Vec<Value>,
    pub attractions: Vec<Value>,
}

impl UnscheduledItems {
    /// Raw entries of `record` whose id does not appear in `days`.
    fn from_record(record: &TripRecord, days: &[DaySchedule]) -> Self {
        let scheduled: HashSet<&str> = days
            .iter()
            .flat_map(|day| day.items.iter())
            .map(TripItem::id)
            .collect();
        let keep = |values: &[Value]| -> Vec<Value> {
            values
                .iter()
                .filter(|value| raw_id(value).map_or(true, |id| !scheduled.contains(id)))
                .cloned()
                .collect()
        };
        Self {
            flights: keep(&record.flights),
            hotels: keep(&record.hotels),
            transportation: keep(&record.transportation),
            attractions: keep(&record.attractions),
        }
    }

    fn values(&self) -> impl Iterator<Item = &Value> {
        self.flights
            .iter()
            .chain(&self.hotels)
            .chain(&self.transportation)
            .chain(&self.attractions)
    }

    pub fn len(&self) -> usize {
        self.values().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.values().any(|value| raw_id(value) == Some(id))
    }

    /// Set an item aside in its raw collection form (no `type` tag).
    pub fn push(&mut self, item: &TripItem) -> Result<()> {
        match item {
            TripItem::Flight(flight) => self.flights.push(serde_json::to_value(flight)?),
            TripItem::Hotel(hotel) => self.hotels.push(serde_json::to_value(hotel)?),
            TripItem::Transportation(ride) => {
                self.transportation.push(serde_json::to_value(ride)?)
            }
            TripItem::Attraction(attraction) => {
                self.attractions.push(serde_json::to_value(attraction)?)
            }
        }
        Ok(())
    }

    /// Remove and return every entry that decodes as an item.
    pub fn take_decodable(&mut self) -> Vec<TripItem> {
        let mut items = Vec::new();
        take_decoded::<Flight>(&mut self.flights, &mut items);
        take_decoded::<Hotel>(&mut self.hotels, &mut items);
        take_decoded::<Transportation>(&mut self.transportation, &mut items);
        take_decoded::<Attraction>(&mut self.attractions, &mut items);
        items
    }
}

/// Stored day of a trip record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: String,
    #[serde(default)]
    pub items: Vec<Value>,
}

impl TripRecord {
    /// Encode a trip. The four collections are derived from the schedule,
    /// followed by the trip's unscheduled raw entries.
    pub fn from_trip(trip: &Trip) -> Result<Self> {
        let collections = ItemCollections::from_items(trip.items());

        let days = trip
            .days
            .iter()
            .map(|day| -> Result<DayRecord> {
                Ok(DayRecord {
                    date: day.date.format("%Y-%m-%d").to_string(),
                    items: day
                        .items
                        .iter()
                        .map(serde_json::to_value)
                        .collect::<std::result::Result<Vec<Value>, serde_json::Error>>()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: trip.id.clone(),
            name: trip.name.clone(),
            description: trip.description.clone(),
            destinations: trip.destinations.clone(),
            start_date: trip.start_date.format("%Y-%m-%d").to_string(),
            end_date: trip.end_date.format("%Y-%m-%d").to_string(),
            status: Some(trip.status.as_str().to_string()),
            days: Some(days),
            flights: with_raw(&collections.flights, &trip.unscheduled.flights)?,
            hotels: with_raw(&collections.hotels, &trip.unscheduled.hotels)?,
            transportation: with_raw(
                &collections.transportation,
                &trip.unscheduled.transportation,
            )?,
            attractions: with_raw(&collections.attractions, &trip.unscheduled.attractions)?,
            budget: trip.budget,
            notes: trip.notes.clone(),
            tags: trip.tags.clone(),
            created_at: Some(format_timestamp(&trip.created_at)),
            updated_at: Some(format_timestamp(&trip.updated_at)),
        })
    }

    /// Decode the four raw collections, skipping items that do not decode.
    pub fn collections(&self) -> ItemCollections {
        ItemCollections {
            flights: decode_items(&self.flights, "flight"),
            hotels: decode_items(&self.hotels, "hotel"),
            transportation: decode_items(&self.transportation, "transportation"),
            attractions: decode_items(&self.attractions, "attraction"),
        }
    }
}

impl Trip {
    /// Build a trip from its record.
    ///
    /// A stored, non-empty `days` list is kept (gaps filled with empty days);
    /// otherwise the schedule is regenerated from the raw collections. Raw
    /// entries that end up off the schedule are kept as unscheduled items.
    pub fn from_record(record: TripRecord, normalizer: &Normalizer) -> Result<Self> {
        let start_date = parse_date(&record.start_date).ok_or_else(|| Error::InvalidDate {
            field: "startDate",
            value: record.start_date.clone(),
        })?;
        let end_date = parse_date(&record.end_date).ok_or_else(|| Error::InvalidDate {
            field: "endDate",
            value: record.end_date.clone(),
        })?;
        if start_date > end_date {
            return Err(Error::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }

        let status = match record.status.as_deref() {
            Some(raw) => raw.parse()?,
            None => TripStatus::default(),
        };

        let stored_days = record.days.as_deref().map(decode_days).unwrap_or_default();
        let days = if stored_days.is_empty() {
            tracing::info!(trip_id = %record.id, "No stored schedule, regenerating from items");
            build_schedule(start_date, end_date, &record.collections(), normalizer)
        } else {
            let mut days = stored_days;
            fill_missing_days(&mut days, start_date, end_date);
            days
        };

        let unscheduled = UnscheduledItems::from_record(&record, &days);
        if !unscheduled.is_empty() {
            tracing::debug!(
                trip_id = %record.id,
                count = unscheduled.len(),
                "Keeping raw items that are not on the schedule"
            );
        }

        let now = Utc::now();
        let created_at = timestamp_or(record.created_at.as_deref(), now, "createdAt");
        let updated_at = timestamp_or(record.updated_at.as_deref(), created_at, "updatedAt");

        let id = if record.id.is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            record.id
        };

        Ok(Trip {
            id,
            name: record.name,
            description: record.description,
            destinations: record.destinations,
            start_date,
            end_date,
            status,
            days,
            unscheduled,
            budget: record.budget,
            notes: record.notes,
            tags: record.tags,
            created_at,
            updated_at,
        })
    }
}

/// Read a trip record from a JSON file.
pub fn load(path: &Path) -> Result<TripRecord> {
    let content = std::fs::read_to_string(path)?;
    let record = serde_json::from_str(&content)?;
    Ok(record)
}

/// Write a trip record as pretty-printed JSON.
pub fn save(path: &Path, record: &TripRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(path, json + "\n")?;
    tracing::debug!(path = %path.display(), "Saved trip record");
    Ok(())
}

/// Decode a single loose item as a tagged [`TripItem`].
pub fn decode_item(value: &Value) -> Result<TripItem> {
    Ok(TripItem::deserialize(value)?)
}

fn decode_items<T: DeserializeOwned>(values: &[Value], kind: &'static str) -> Vec<T> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match T::deserialize(value) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(
                    kind,
                    index,
                    item_id = raw_id(value).unwrap_or(""),
                    error = %e,
                    "Skipping malformed item"
                );
                None
            }
        })
        .collect()
}

fn decode_days(records: &[DayRecord]) -> Vec<DaySchedule> {
    records
        .iter()
        .filter_map(|record| {
            let Some(date) = parse_date(&record.date) else {
                tracing::warn!(date = %record.date, "Skipping stored day with unparseable date");
                return None;
            };
            Some(DaySchedule {
                date,
                items: decode_items(&record.items, "scheduled item"),
            })
        })
        .collect()
}

fn take_decoded<T>(values: &mut Vec<Value>, out: &mut Vec<TripItem>)
where
    T: DeserializeOwned + Into<TripItem>,
{
    values.retain(|value| match T::deserialize(value) {
        Ok(item) => {
            out.push(item.into());
            false
        }
        Err(_) => true,
    });
}

fn raw_id(value: &Value) -> Option<&str> {
    value.get("id").and_then(Value::as_str)
}

fn with_raw<T: Serialize>(items: &[T], raw: &[Value]) -> Result<Vec<Value>> {
    let mut values = items
        .iter()
        .map(|item| serde_json::to_value(item).map_err(Error::from))
        .collect::<Result<Vec<_>>>()?;
    values.extend(raw.iter().cloned());
    Ok(values)
}

fn timestamp_or(raw: Option<&str>, fallback: DateTime<Utc>, field: &'static str) -> DateTime<Utc> {
    match raw {
        Some(value) => parse_timestamp(value).unwrap_or_else(|| {
            tracing::warn!(field, value, "Unparseable trip timestamp, using fallback");
            fallback
        }),
        None => fallback,
    }
}
