//! Text and JSON output for CLI commands.

use anyhow::Result;
use waypoint_core::format::{format_day_heading, format_minutes, format_money};
use waypoint_core::itinerary::{item_label, render_day, Normalizer, TimelineEntry, TripSummary};
use waypoint_core::{ItemKind, Trip, TripItem};

/// Prints trips with a fixed currency symbol and viewer offset.
pub struct Printer {
    currency: String,
    normalizer: Normalizer,
}

impl Printer {
    pub fn new(currency: &str, normalizer: Normalizer) -> Self {
        Self {
            currency: currency.to_string(),
            normalizer,
        }
    }

    fn money(&self, amount: f64) -> String {
        format_money(amount, &self.currency)
    }

    pub fn print_schedule(&self, trip: &Trip) {
        println!(
            "{} ({} to {}, {})",
            trip.name, trip.start_date, trip.end_date, trip.status
        );
        if !trip.destinations.is_empty() {
            println!("Destinations: {}", trip.destinations.join(", "));
        }

        for (index, day) in trip.days.iter().enumerate() {
            println!();
            println!("{}", format_day_heading(index, day.date));

            let entries = render_day(day, &self.normalizer);
            if entries.is_empty() {
                println!("  (nothing planned)");
                continue;
            }
            for entry in &entries {
                println!("{}", self.timeline_line(entry));
            }
        }
    }

    fn timeline_line(&self, entry: &TimelineEntry) -> String {
        match entry.amount {
            Some(amount) => format!("  {}  {}  {}", entry.time, entry.label, self.money(amount)),
            None => format!("  {}  {}", entry.time, entry.label),
        }
    }

    pub fn print_schedule_json(&self, trip: &Trip) -> Result<()> {
        let output = serde_json::json!({
            "trip_id": trip.id,
            "name": trip.name,
            "status": trip.status,
            "days": trip.days.iter().map(|day| {
                serde_json::json!({
                    "date": day.date.format("%Y-%m-%d").to_string(),
                    "entries": render_day(day, &self.normalizer),
                })
            }).collect::<Vec<_>>(),
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    pub fn print_summary(&self, trip: &Trip, summary: &TripSummary) {
        println!("{} ({} days)", trip.name, summary.days);
        for kind in ItemKind::ALL {
            println!(
                "  {:<16}{:>12}  ({})",
                format!("{}:", kind.plural()),
                self.money(summary.costs.get(kind)),
                summary.counts.get(kind)
            );
        }
        println!("  {:<16}{:>12}", "Total:", self.money(summary.total_cost));

        if let Some(remaining) = summary.budget_remaining {
            let label = if summary.is_over_budget() {
                "Over budget:"
            } else {
                "Budget left:"
            };
            println!("  {:<16}{:>12}", label, self.money(remaining.abs()));
        }
        println!("Hotel pricing: {}", summary.hotel_pricing.as_str());
    }

    pub fn print_items(&self, kind: ItemKind, items: &[&TripItem]) {
        println!("{} ({})", kind.plural(), items.len());
        for item in items {
            let anchor = self.normalizer.anchor(item);
            let mut line = format!(
                "  {} {}  {}  [{}]",
                anchor.date,
                anchor.time.format("%H:%M"),
                item_label(item, &self.normalizer),
                item.id()
            );
            if let Some(detail) = self.item_detail(item) {
                line.push_str("  ");
                line.push_str(&detail);
            }
            println!("{}", line);
        }
    }

    fn item_detail(&self, item: &TripItem) -> Option<String> {
        match item {
            TripItem::Flight(flight) => Some(self.money(flight.price)),
            TripItem::Hotel(hotel) => Some(format!(
                "{}/night, {} night(s), {}",
                self.money(hotel.price_per_night),
                hotel.nights(),
                hotel.room_type
            )),
            TripItem::Transportation(ride) => Some(self.money(ride.cost)),
            TripItem::Attraction(attraction) if attraction.duration > 0 => Some(format!(
                "{}, {}",
                format_minutes(attraction.duration),
                self.money(attraction.cost)
            )),
            TripItem::Attraction(attraction) => Some(self.money(attraction.cost)),
        }
    }
}
