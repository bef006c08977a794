//! Core domain types for waypoint
//!
//! These types model a trip itinerary: the four kinds of bookable items, the
//! per-day schedule they are bucketed into, and the trip that owns it.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **TripItem** | One of Flight, Hotel, Transportation or Attraction |
//! | **Anchor datetime** | The single timestamp per item used to pick its calendar day |
//! | **DaySchedule** | One calendar day of a trip with the items occurring on it |
//! | **Bucketing** | Assigning items to day schedules by anchor date |
//!
//! Items use camelCase JSON keys and a `type` tag so trip records written by
//! the planner front end deserialize directly.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::record::UnscheduledItems;

// ============================================
// Shared value types
// ============================================

/// Latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A place an item happens at, as returned by the place search services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

impl Location {
    /// Best human label: name, then address.
    ///
    /// Blank strings count as missing.
    pub fn label(&self) -> Option<&str> {
        non_blank(self.name.as_deref()).or_else(|| non_blank(self.address.as_deref()))
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// An airport referenced by a flight
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    /// IATA code, e.g. "DXB"
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

// ============================================
// Items
// ============================================

/// A booked or planned flight.
///
/// `departure_time_local` / `arrival_time_local` carry the airport-local wall
/// clock with its offset (`"2025-11-13 14:00+02:00"`). When present they take
/// precedence over the UTC fields for calendar-day and time-of-day purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: String,
    pub airline: String,
    pub flight_number: String,
    pub departure_airport: Airport,
    pub arrival_airport: Airport,
    #[serde(with = "crate::time::timestamp")]
    pub departure_date_time: DateTime<Utc>,
    #[serde(with = "crate::time::timestamp")]
    pub arrival_date_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time_local: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time_local: Option<String>,
    #[serde(default)]
    pub price: f64,
    /// Number of stops between departure and arrival
    #[serde(default)]
    pub layovers: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cabin_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baggage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_reference: Option<String>,
}

/// A hotel stay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Location,
    #[serde(with = "crate::time::timestamp")]
    pub check_in: DateTime<Utc>,
    #[serde(with = "crate::time::timestamp")]
    pub check_out: DateTime<Utc>,
    #[serde(default)]
    pub price_per_night: f64,
    #[serde(default)]
    pub room_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_reference: Option<String>,
}

impl Hotel {
    /// Nights between check-in and check-out calendar dates, at least one.
    pub fn nights(&self) -> u32 {
        let nights = (self.check_out.date_naive() - self.check_in.date_naive()).num_days();
        nights.max(1) as u32
    }

    /// Full stay price: nightly rate times nights.
    pub fn stay_total(&self) -> f64 {
        self.price_per_night * f64::from(self.nights())
    }
}

/// How a ground transfer is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportMode {
    Taxi,
    RentalCar,
    Shuttle,
    PublicTransport,
    Walk,
}

impl TransportMode {
    /// Returns the identifier used in trip records
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Taxi => "taxi",
            TransportMode::RentalCar => "rental-car",
            TransportMode::Shuttle => "shuttle",
            TransportMode::PublicTransport => "public-transport",
            TransportMode::Walk => "walk",
        }
    }

    /// Record identifier with its first letter capitalized ("Rental-car").
    pub fn display_name(&self) -> String {
        let raw = self.as_str();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TransportMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "taxi" => Ok(TransportMode::Taxi),
            "rental-car" => Ok(TransportMode::RentalCar),
            "shuttle" => Ok(TransportMode::Shuttle),
            "public-transport" => Ok(TransportMode::PublicTransport),
            "walk" => Ok(TransportMode::Walk),
            _ => Err(Error::UnknownValue {
                kind: "transport mode",
                value: s.to_string(),
            }),
        }
    }
}

/// A ground transfer between two places
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transportation {
    pub id: String,
    pub mode: TransportMode,
    #[serde(default)]
    pub pickup_location: Location,
    #[serde(default)]
    pub dropoff_location: Location,
    #[serde(with = "crate::time::timestamp")]
    pub pickup_date_time: DateTime<Utc>,
    #[serde(
        default,
        with = "crate::time::timestamp_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub dropoff_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_reference: Option<String>,
}

/// Kind of attraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttractionCategory {
    Sight,
    Activity,
    Restaurant,
    Shopping,
    Entertainment,
    #[default]
    Other,
}

impl AttractionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttractionCategory::Sight => "sight",
            AttractionCategory::Activity => "activity",
            AttractionCategory::Restaurant => "restaurant",
            AttractionCategory::Shopping => "shopping",
            AttractionCategory::Entertainment => "entertainment",
            AttractionCategory::Other => "other",
        }
    }
}

/// A sight, activity, meal or other scheduled visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attraction {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub category: AttractionCategory,
    #[serde(with = "crate::time::timestamp")]
    pub start_date_time: DateTime<Utc>,
    /// Planned visit length in minutes
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub booking_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opening_hours: Vec<String>,
}

/// Discriminant of [`TripItem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Flight,
    Hotel,
    Transportation,
    Attraction,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Flight,
        ItemKind::Hotel,
        ItemKind::Transportation,
        ItemKind::Attraction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Flight => "flight",
            ItemKind::Hotel => "hotel",
            ItemKind::Transportation => "transportation",
            ItemKind::Attraction => "attraction",
        }
    }

    /// Plural heading used for category tabs
    pub fn plural(&self) -> &'static str {
        match self {
            ItemKind::Flight => "Flights",
            ItemKind::Hotel => "Hotels",
            ItemKind::Transportation => "Transportation",
            ItemKind::Attraction => "Attractions",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ItemKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flight" | "flights" => Ok(ItemKind::Flight),
            "hotel" | "hotels" => Ok(ItemKind::Hotel),
            "transportation" | "transport" => Ok(ItemKind::Transportation),
            "attraction" | "attractions" => Ok(ItemKind::Attraction),
            _ => Err(Error::UnknownValue {
                kind: "item kind",
                value: s.to_string(),
            }),
        }
    }
}

/// Anything that can sit on a trip's schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TripItem {
    Flight(Flight),
    Hotel(Hotel),
    Transportation(Transportation),
    Attraction(Attraction),
}

impl TripItem {
    pub fn id(&self) -> &str {
        match self {
            TripItem::Flight(f) => &f.id,
            TripItem::Hotel(h) => &h.id,
            TripItem::Transportation(t) => &t.id,
            TripItem::Attraction(a) => &a.id,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            TripItem::Flight(_) => ItemKind::Flight,
            TripItem::Hotel(_) => ItemKind::Hotel,
            TripItem::Transportation(_) => ItemKind::Transportation,
            TripItem::Attraction(_) => ItemKind::Attraction,
        }
    }

    /// The price or cost field carried by the item.
    ///
    /// Hotels carry a nightly rate rather than a price, so they report `None`.
    pub fn listed_amount(&self) -> Option<f64> {
        match self {
            TripItem::Flight(f) => Some(f.price),
            TripItem::Hotel(_) => None,
            TripItem::Transportation(t) => Some(t.cost),
            TripItem::Attraction(a) => Some(a.cost),
        }
    }
}

impl From<Flight> for TripItem {
    fn from(item: Flight) -> Self {
        TripItem::Flight(item)
    }
}

impl From<Hotel> for TripItem {
    fn from(item: Hotel) -> Self {
        TripItem::Hotel(item)
    }
}

impl From<Transportation> for TripItem {
    fn from(item: Transportation) -> Self {
        TripItem::Transportation(item)
    }
}

impl From<Attraction> for TripItem {
    fn from(item: Attraction) -> Self {
        TripItem::Attraction(item)
    }
}

/// The four raw item collections a trip is assembled from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemCollections {
    pub flights: Vec<Flight>,
    pub hotels: Vec<Hotel>,
    pub transportation: Vec<Transportation>,
    pub attractions: Vec<Attraction>,
}

impl ItemCollections {
    /// Split a flat item list back into per-kind collections, keeping order.
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a TripItem>) -> Self {
        let mut collections = Self::default();
        for item in items {
            match item {
                TripItem::Flight(f) => collections.flights.push(f.clone()),
                TripItem::Hotel(h) => collections.hotels.push(h.clone()),
                TripItem::Transportation(t) => collections.transportation.push(t.clone()),
                TripItem::Attraction(a) => collections.attractions.push(a.clone()),
            }
        }
        collections
    }

    /// All items in scan order: flights, hotels, transportation, attractions.
    pub fn items(&self) -> impl Iterator<Item = TripItem> + '_ {
        self.flights
            .iter()
            .cloned()
            .map(TripItem::from)
            .chain(self.hotels.iter().cloned().map(TripItem::from))
            .chain(self.transportation.iter().cloned().map(TripItem::from))
            .chain(self.attractions.iter().cloned().map(TripItem::from))
    }

    pub fn len(&self) -> usize {
        self.flights.len() + self.hotels.len() + self.transportation.len() + self.attractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================
// Schedule
// ============================================

/// One calendar day of a trip and the items on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    #[serde(with = "crate::time::date")]
    pub date: NaiveDate,
    pub items: Vec<TripItem>,
}

impl DaySchedule {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            items: Vec::new(),
        }
    }
}

// ============================================
// Trip
// ============================================

/// Lifecycle of a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TripStatus {
    #[default]
    Planning,
    Booked,
    InProgress,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Planning => "planning",
            TripStatus::Booked => "booked",
            TripStatus::InProgress => "in-progress",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }

    /// Completed and cancelled trips accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TripStatus::Completed | TripStatus::Cancelled)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// `planning → booked → in-progress → completed`, plus `cancelled` from
    /// any non-terminal state. Staying put is always allowed.
    pub fn can_transition_to(&self, next: TripStatus) -> bool {
        if *self == next {
            return true;
        }
        match (self, next) {
            (TripStatus::Planning, TripStatus::Booked)
            | (TripStatus::Booked, TripStatus::InProgress)
            | (TripStatus::InProgress, TripStatus::Completed) => true,
            (from, TripStatus::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TripStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planning" => Ok(TripStatus::Planning),
            "booked" => Ok(TripStatus::Booked),
            "in-progress" | "in_progress" => Ok(TripStatus::InProgress),
            "completed" => Ok(TripStatus::Completed),
            "cancelled" | "canceled" => Ok(TripStatus::Cancelled),
            _ => Err(Error::UnknownValue {
                kind: "trip status",
                value: s.to_string(),
            }),
        }
    }
}

/// A trip and its day-by-day schedule.
///
/// The schedule is owned exclusively by the trip; total cost and per-category
/// views are derived from it on demand (see [`crate::itinerary::aggregate`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub destinations: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TripStatus,
    pub days: Vec<DaySchedule>,
    /// Raw entries kept with the trip but not on any day
    pub unscheduled: UnscheduledItems,
    pub budget: Option<f64>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    /// Every scheduled item, day by day.
    pub fn items(&self) -> impl Iterator<Item = &TripItem> {
        self.days.iter().flat_map(|day| day.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.days.iter().map(|day| day.items.len()).sum()
    }

    pub fn find_item(&self, id: &str) -> Option<&TripItem> {
        self.items().find(|item| item.id() == id)
    }

    /// Number of calendar days from start to end, inclusive.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}
