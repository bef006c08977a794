//! Trip aggregate: derived totals and per-category views.
//!
//! Nothing here is stored on the trip. Totals are recomputed from the day
//! buckets on every call; [`collection_cost`] computes the same figure from
//! the raw collections, and the two agree for any fully in-range trip.

use serde::{Deserialize, Serialize};

use crate::types::{
    Attraction, Flight, Hotel, ItemCollections, ItemKind, Transportation, Trip, TripItem,
};

/// How hotels contribute to trip cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HotelPricing {
    /// One nightly rate per hotel, regardless of stay length
    #[default]
    PerNight,
    /// Nightly rate times nights stayed
    PerStay,
}

impl HotelPricing {
    pub fn as_str(&self) -> &'static str {
        match self {
            HotelPricing::PerNight => "per-night",
            HotelPricing::PerStay => "per-stay",
        }
    }

    pub fn hotel_cost(&self, hotel: &Hotel) -> f64 {
        match self {
            HotelPricing::PerNight => hotel.price_per_night,
            HotelPricing::PerStay => hotel.stay_total(),
        }
    }
}

impl std::str::FromStr for HotelPricing {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per-night" => Ok(HotelPricing::PerNight),
            "per-stay" => Ok(HotelPricing::PerStay),
            _ => Err(crate::Error::UnknownValue {
                kind: "hotel pricing",
                value: s.to_string(),
            }),
        }
    }
}

/// Cost contribution of a single item.
pub fn item_cost(item: &TripItem, pricing: HotelPricing) -> f64 {
    match item {
        TripItem::Flight(flight) => flight.price,
        TripItem::Hotel(hotel) => pricing.hotel_cost(hotel),
        TripItem::Transportation(ride) => ride.cost,
        TripItem::Attraction(attraction) => attraction.cost,
    }
}

/// Sum of every scheduled item's cost, hotels at their nightly rate.
pub fn total_cost(trip: &Trip) -> f64 {
    total_cost_with(trip, HotelPricing::default())
}

/// Sum of every scheduled item's cost under the given hotel pricing.
pub fn total_cost_with(trip: &Trip, pricing: HotelPricing) -> f64 {
    trip.items().map(|item| item_cost(item, pricing)).sum()
}

/// Per-category totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub flights: f64,
    pub hotels: f64,
    pub transportation: f64,
    pub attractions: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.flights + self.hotels + self.transportation + self.attractions
    }

    pub fn get(&self, kind: ItemKind) -> f64 {
        match kind {
            ItemKind::Flight => self.flights,
            ItemKind::Hotel => self.hotels,
            ItemKind::Transportation => self.transportation,
            ItemKind::Attraction => self.attractions,
        }
    }
}

/// Per-category cost of a trip's scheduled items.
pub fn cost_breakdown(trip: &Trip, pricing: HotelPricing) -> CostBreakdown {
    let mut breakdown = CostBreakdown::default();
    for item in trip.items() {
        let cost = item_cost(item, pricing);
        match item.kind() {
            ItemKind::Flight => breakdown.flights += cost,
            ItemKind::Hotel => breakdown.hotels += cost,
            ItemKind::Transportation => breakdown.transportation += cost,
            ItemKind::Attraction => breakdown.attractions += cost,
        }
    }
    breakdown
}

/// Per-category cost of raw item collections, before bucketing.
pub fn collection_cost(collections: &ItemCollections, pricing: HotelPricing) -> CostBreakdown {
    CostBreakdown {
        flights: collections.flights.iter().map(|f| f.price).sum(),
        hotels: collections
            .hotels
            .iter()
            .map(|h| pricing.hotel_cost(h))
            .sum(),
        transportation: collections.transportation.iter().map(|t| t.cost).sum(),
        attractions: collections.attractions.iter().map(|a| a.cost).sum(),
    }
}

/// Scheduled items with the given tag, in schedule order.
pub fn items_of_kind(trip: &Trip, kind: ItemKind) -> Vec<&TripItem> {
    trip.items().filter(|item| item.kind() == kind).collect()
}

/// A concrete item struct that can be pulled back out of a [`TripItem`].
pub trait ItemVariant: Sized {
    const KIND: ItemKind;

    fn from_item(item: &TripItem) -> Option<&Self>;
}

impl ItemVariant for Flight {
    const KIND: ItemKind = ItemKind::Flight;

    fn from_item(item: &TripItem) -> Option<&Self> {
        match item {
            TripItem::Flight(flight) => Some(flight),
            _ => None,
        }
    }
}

impl ItemVariant for Hotel {
    const KIND: ItemKind = ItemKind::Hotel;

    fn from_item(item: &TripItem) -> Option<&Self> {
        match item {
            TripItem::Hotel(hotel) => Some(hotel),
            _ => None,
        }
    }
}

impl ItemVariant for Transportation {
    const KIND: ItemKind = ItemKind::Transportation;

    fn from_item(item: &TripItem) -> Option<&Self> {
        match item {
            TripItem::Transportation(ride) => Some(ride),
            _ => None,
        }
    }
}

impl ItemVariant for Attraction {
    const KIND: ItemKind = ItemKind::Attraction;

    fn from_item(item: &TripItem) -> Option<&Self> {
        match item {
            TripItem::Attraction(attraction) => Some(attraction),
            _ => None,
        }
    }
}

/// Scheduled items of one concrete type, e.g. `items_of_type::<Hotel>(&trip)`.
pub fn items_of_type<T: ItemVariant>(trip: &Trip) -> Vec<&T> {
    items_of_kind(trip, T::KIND)
        .into_iter()
        .filter_map(T::from_item)
        .collect()
}

/// Item counts per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub flights: usize,
    pub hotels: usize,
    pub transportation: usize,
    pub attractions: usize,
}

impl CategoryCounts {
    pub fn get(&self, kind: ItemKind) -> usize {
        match kind {
            ItemKind::Flight => self.flights,
            ItemKind::Hotel => self.hotels,
            ItemKind::Transportation => self.transportation,
            ItemKind::Attraction => self.attractions,
        }
    }

    pub fn total(&self) -> usize {
        self.flights + self.hotels + self.transportation + self.attractions
    }
}

pub fn category_counts(trip: &Trip) -> CategoryCounts {
    CategoryCounts {
        flights: items_of_type::<Flight>(trip).len(),
        hotels: items_of_type::<Hotel>(trip).len(),
        transportation: items_of_type::<Transportation>(trip).len(),
        attractions: items_of_type::<Attraction>(trip).len(),
    }
}

/// Everything the trip overview shows at a glance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSummary {
    pub days: usize,
    pub counts: CategoryCounts,
    pub costs: CostBreakdown,
    pub total_cost: f64,
    pub hotel_pricing: HotelPricing,
    /// Budget minus total cost, when a budget is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_remaining: Option<f64>,
}

impl TripSummary {
    pub fn for_trip(trip: &Trip, pricing: HotelPricing) -> Self {
        let costs = cost_breakdown(trip, pricing);
        let total_cost = costs.total();
        Self {
            days: trip.days.len(),
            counts: category_counts(trip),
            costs,
            total_cost,
            hotel_pricing: pricing,
            budget_remaining: trip.budget.map(|budget| budget - total_cost),
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.budget_remaining.is_some_and(|remaining| remaining < 0.0)
    }
}
