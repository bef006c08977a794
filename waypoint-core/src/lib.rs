//! # waypoint-core
//!
//! Itinerary assembly for trip planning.
//!
//! This library provides:
//! - Domain types for flights, hotels, ground transportation and attractions
//! - Day-by-day schedule assembly from independently sourced item lists
//! - Timeline rendering rules and trip-level cost aggregates
//! - Trip record (JSON) conversion
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Pipeline
//!
//! - **Normalize:** each item gets an anchor date and time ([`Normalizer`])
//! - **Bucket:** items land on the trip day matching their anchor date
//! - **Render:** a day's items are ordered by time and labelled
//! - **Aggregate:** totals and category views are derived on demand
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use waypoint_core::{itinerary, record, Config, Trip};
//!
//! let config = Config::load().expect("failed to load config");
//! let normalizer = config.schedule.normalizer().expect("bad schedule config");
//!
//! let raw = record::load(Path::new("trip.json")).expect("failed to read trip");
//! let trip = Trip::from_record(raw, &normalizer).expect("invalid trip");
//!
//! for day in &trip.days {
//!     for entry in itinerary::render_day(day, &normalizer) {
//!         println!("{} {}", entry.time, entry.label);
//!     }
//! }
//! println!("total: {:.2}", itinerary::total_cost(&trip));
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use itinerary::{HotelPricing, Normalizer, TripSummary};
pub use record::{TripRecord, UnscheduledItems};
pub use types::*;

// Public modules
pub mod config;
pub mod error;
pub mod format;
pub mod itinerary;
pub mod logging;
pub mod record;
pub mod time;
pub mod types;
