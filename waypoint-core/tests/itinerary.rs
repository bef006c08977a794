//! Integration tests for itinerary assembly
//!
//! These tests load trip records from `tests/fixtures/trips/` and check the
//! schedule, rendering and aggregate contracts end to end.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{FixedOffset, NaiveDate};
use tempfile::TempDir;
use waypoint_core::itinerary::{
    self, build_schedule, collection_cost, items_of_kind, items_of_type, render_day, total_cost,
    HotelPricing, Normalizer,
};
use waypoint_core::record::{self, TripRecord};
use waypoint_core::{Hotel, ItemKind, Trip, TripStatus};

/// Get the path to a fixture file
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/trips")
        .join(name)
}

fn load_fixture(name: &str) -> TripRecord {
    record::load(&fixture_path(name)).expect("fixture should load")
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
}

fn day_ids(trip: &Trip, index: usize) -> Vec<String> {
    trip.days[index]
        .items
        .iter()
        .map(|item| item.id().to_string())
        .collect()
}

// ============================================
// Schedule shape
// ============================================

#[test]
fn test_one_day_per_date_without_gaps() {
    let trip = Trip::from_record(load_fixture("london-three-days.json"), &Normalizer::utc())
        .expect("trip should convert");

    assert_eq!(trip.days.len() as i64, trip.duration_days());
    assert_eq!(trip.days.len(), 3);
    for (offset, day) in trip.days.iter().enumerate() {
        assert_eq!(day.date, date(13 + offset as u32));
    }
}

#[test]
fn test_in_range_items_appear_exactly_once() {
    waypoint_core::logging::init_test();
    let raw = load_fixture("london-three-days.json");
    let collections = raw.collections();
    let trip = Trip::from_record(raw, &Normalizer::utc()).unwrap();

    let scheduled: Vec<_> = trip.items().map(|item| item.id().to_string()).collect();
    let unique: HashSet<_> = scheduled.iter().cloned().collect();
    assert_eq!(scheduled.len(), unique.len(), "no item scheduled twice");

    // Every decodable item except the one after the trip ends
    assert_eq!(collections.len(), 7);
    assert_eq!(scheduled.len(), 6);
    assert!(!unique.contains("attr-after-trip"));
    // Malformed items never reach the schedule
    assert!(!unique.contains("ride-broken"));
    assert!(!unique.contains("attr-no-time"));
}

#[test]
fn test_build_schedule_is_idempotent() {
    let collections = load_fixture("london-three-days.json").collections();
    let normalizer = Normalizer::utc();
    let first = build_schedule(date(13), date(15), &collections, &normalizer);
    let second = build_schedule(date(13), date(15), &collections, &normalizer);
    assert_eq!(first, second);
}

// ============================================
// Day bucketing scenarios
// ============================================

#[test]
fn test_local_departure_string_decides_the_day() {
    let trip = Trip::from_record(load_fixture("london-three-days.json"), &Normalizer::utc())
        .unwrap();
    assert!(day_ids(&trip, 0).contains(&"flight-out".to_string()));
}

#[test]
fn test_utc_departure_without_local_string() {
    let trip = Trip::from_record(load_fixture("london-three-days.json"), &Normalizer::utc())
        .unwrap();
    assert!(day_ids(&trip, 1).contains(&"flight-hop".to_string()));

    // A viewer five hours behind UTC sees the hop on the evening of the 13th
    let west = Normalizer::with_offset(FixedOffset::west_opt(5 * 3600).unwrap());
    let trip = Trip::from_record(load_fixture("london-three-days.json"), &west).unwrap();
    assert!(day_ids(&trip, 0).contains(&"flight-hop".to_string()));
    // The local string keeps the outbound flight on the 13th for this viewer too
    assert!(day_ids(&trip, 0).contains(&"flight-out".to_string()));
}

// ============================================
// Rendering
// ============================================

#[test]
fn test_first_day_timeline() {
    let normalizer = Normalizer::utc();
    let trip = Trip::from_record(load_fixture("london-three-days.json"), &normalizer).unwrap();
    let rows = render_day(&trip.days[0], &normalizer);

    let lines: Vec<_> = rows
        .iter()
        .map(|row| format!("{} {}", row.time, row.label))
        .collect();
    assert_eq!(
        lines,
        vec![
            "00:00 The Savoy - Check-in",
            "14:00 Emirates EK 1: DXB → LHR (arrives 17:40)",
            "18:15 Taxi: Heathrow Terminal 3 → Strand, London WC2R 0EZ",
        ]
    );
    assert_eq!(rows[1].amount_display().as_deref(), Some("640.50"));
    assert_eq!(rows[0].amount, None);
}

// ============================================
// Aggregates
// ============================================

#[test]
fn test_total_cost_two_ways() {
    let raw = load_fixture("london-three-days.json");
    let trip = Trip::from_record(raw.clone(), &Normalizer::utc()).unwrap();

    // Only in-range items are comparable with the scheduled total
    let mut collections = raw.collections();
    collections.attractions.retain(|a| a.id != "attr-after-trip");

    for pricing in [HotelPricing::PerNight, HotelPricing::PerStay] {
        let scheduled = itinerary::total_cost_with(&trip, pricing);
        let by_category = collection_cost(&collections, pricing);
        assert!((scheduled - by_category.total()).abs() < 1e-9);
    }
}

#[test]
fn test_hotel_contributes_nightly_rate_by_default() {
    let trip = Trip::from_record(load_fixture("london-three-days.json"), &Normalizer::utc())
        .unwrap();
    let hotels = items_of_type::<Hotel>(&trip);
    assert_eq!(hotels.len(), 1);
    assert_eq!(hotels[0].nights(), 2);

    let per_night = itinerary::cost_breakdown(&trip, HotelPricing::PerNight);
    assert_eq!(per_night.hotels, 200.0);
    let per_stay = itinerary::cost_breakdown(&trip, HotelPricing::PerStay);
    assert_eq!(per_stay.hotels, 400.0);

    // 640.5 + 89 + 200 + 75 + 33.6 + 95
    assert!((total_cost(&trip) - 1133.1).abs() < 1e-9);
}

#[test]
fn test_items_of_kind() {
    let trip = Trip::from_record(load_fixture("london-three-days.json"), &Normalizer::utc())
        .unwrap();
    assert_eq!(items_of_kind(&trip, ItemKind::Flight).len(), 2);
    assert_eq!(items_of_kind(&trip, ItemKind::Hotel).len(), 1);
    assert_eq!(items_of_kind(&trip, ItemKind::Transportation).len(), 1);
    assert_eq!(items_of_kind(&trip, ItemKind::Attraction).len(), 2);
}

// ============================================
// Mutations and records
// ============================================

#[test]
fn test_remove_unknown_id_keeps_everything() {
    let mut trip = Trip::from_record(load_fixture("london-three-days.json"), &Normalizer::utc())
        .unwrap();
    trip.remove_item("attr-show");
    assert_eq!(trip.item_count(), 5);

    let before: Vec<_> = trip.items().cloned().collect();
    assert_eq!(trip.remove_item("nonexistent-id"), 0);
    let after: Vec<_> = trip.items().cloned().collect();
    assert_eq!(before, after);
}

#[test]
fn test_added_items_keep_days_sorted() {
    let normalizer = Normalizer::utc();
    let mut trip = Trip::from_record(load_fixture("london-three-days.json"), &normalizer).unwrap();
    let breakfast = record::decode_item(&serde_json::json!({
        "type": "attraction",
        "id": "attr-breakfast",
        "name": "Breakfast at The Wolseley",
        "category": "restaurant",
        "startDateTime": "2025-11-14T08:00:00.000Z",
        "cost": 40
    }))
    .unwrap();

    trip.add_item(breakfast, date(14), &normalizer);
    let anchors: Vec<_> = trip.days[1]
        .items
        .iter()
        .map(|item| normalizer.anchor(item).time)
        .collect();
    assert!(anchors.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(day_ids(&trip, 1)[0], "flight-hop");
}

#[test]
fn test_record_save_and_reload() {
    let normalizer = Normalizer::utc();
    let mut trip = Trip::from_record(load_fixture("london-three-days.json"), &normalizer).unwrap();
    trip.transition_to(TripStatus::InProgress).unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trip.json");
    record::save(&path, &TripRecord::from_trip(&trip).unwrap()).unwrap();

    let reloaded = Trip::from_record(record::load(&path).unwrap(), &normalizer).unwrap();
    assert_eq!(reloaded.id, "trip-london-001");
    assert_eq!(reloaded.status, TripStatus::InProgress);
    assert_eq!(reloaded.days, trip.days);
    assert_eq!(trip.unscheduled.len(), 3);
    assert_eq!(reloaded.unscheduled, trip.unscheduled);
    assert_eq!(reloaded.budget, Some(2500.0));
    assert_eq!(reloaded.tags, vec!["city".to_string(), "autumn".to_string()]);
}
