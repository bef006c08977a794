//! Itinerary assembly
//!
//! Raw item collections flow through four stages:
//! - [`anchor`]: pick each item's calendar day and time of day
//! - [`schedule`]: bucket items into one [`DaySchedule`](crate::types::DaySchedule) per trip day
//! - [`render`]: order a day's items and derive their display lines
//! - [`aggregate`]: trip-level totals and per-category views
//!
//! All of it is synchronous and pure apart from the `Trip` mutations in
//! [`trip`], which bump `updated_at`.

pub mod aggregate;
pub mod anchor;
pub mod render;
pub mod schedule;
pub mod trip;

pub use aggregate::{
    category_counts, collection_cost, cost_breakdown, item_cost, items_of_kind, items_of_type,
    total_cost, total_cost_with, CategoryCounts, CostBreakdown, HotelPricing, ItemVariant,
    TripSummary,
};
pub use anchor::{Anchor, Normalizer};
pub use render::{item_label, render_day, TimelineEntry};
pub use schedule::{build_schedule, fill_missing_days, trip_days};
