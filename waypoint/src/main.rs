//! waypoint - trip itinerary assembly CLI
//!
//! Reads a trip record (JSON), assembles its day-by-day schedule and prints
//! timelines, cost summaries and category views. Mutating commands rewrite
//! the record file in place.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Logs: $XDG_STATE_HOME/waypoint/waypoint.log.YYYY-MM-DD (~/.local/state/waypoint/)
//! - Config: $XDG_CONFIG_HOME/waypoint/config.toml (~/.config/waypoint/config.toml)

mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use waypoint_core::itinerary::{items_of_kind, HotelPricing, Normalizer, TripSummary};
use waypoint_core::record::{self, TripRecord};
use waypoint_core::time::parse_offset;
use waypoint_core::{Config, ItemKind, Trip, TripStatus};

use crate::output::Printer;

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(about = "Assemble and inspect trip itineraries")]
#[command(version)]
struct Args {
    /// Viewer offset from UTC for placing timestamps on the calendar (e.g. +02:00)
    #[arg(long, global = true, allow_hyphen_values = true)]
    utc_offset: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new, empty trip record
    New {
        #[arg(long)]
        name: String,
        /// First day of the trip (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Last day of the trip (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
        /// Destination (repeatable)
        #[arg(long = "destination")]
        destinations: Vec<String>,
        #[arg(long)]
        budget: Option<f64>,
        /// Where to write the record
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the day-by-day timeline
    Schedule {
        file: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Print total cost and per-category breakdown
    Cost {
        file: PathBuf,
        /// Override the configured hotel pricing
        #[arg(long)]
        hotel_pricing: Option<HotelPricing>,
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// List scheduled items of one kind
    Items {
        file: PathBuf,
        #[arg(short, long)]
        kind: ItemKind,
    },

    /// Add an item (JSON with a "type" tag) to the trip
    Add {
        file: PathBuf,
        /// Path to the item JSON
        #[arg(long)]
        item: PathBuf,
        /// Day to put the item on (defaults to its anchor date)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Remove an item by id
    Remove { file: PathBuf, id: String },

    /// Change the trip status
    Status {
        file: PathBuf,
        status: TripStatus,
        /// Skip the lifecycle check
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;

    let _log_guard =
        waypoint_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let normalizer = match args.utc_offset.as_deref() {
        Some(raw) => parse_offset(raw)
            .map(Normalizer::with_offset)
            .with_context(|| format!("invalid --utc-offset {:?}, expected +HH:MM", raw))?,
        None => config
            .schedule
            .normalizer()
            .context("invalid schedule configuration")?,
    };

    tracing::info!(offset = %normalizer.offset(), "waypoint starting");

    let printer = Printer::new(&config.display.currency_symbol, normalizer);

    match args.command {
        Command::New {
            name,
            start,
            end,
            destinations,
            budget,
            output,
        } => {
            if output.exists() {
                anyhow::bail!("{} already exists", output.display());
            }
            let mut trip = Trip::new(name, start, end).context("failed to create trip")?;
            trip.destinations = destinations;
            trip.budget = budget;
            save_trip(&output, &trip)?;
            println!(
                "Created trip {} ({} days) at {}",
                trip.id,
                trip.days.len(),
                output.display()
            );
        }

        Command::Schedule { file, format } => {
            let trip = load_trip(&file, &normalizer)?;
            match format {
                Format::Text => printer.print_schedule(&trip),
                Format::Json => printer.print_schedule_json(&trip)?,
            }
        }

        Command::Cost {
            file,
            hotel_pricing,
            format,
        } => {
            let trip = load_trip(&file, &normalizer)?;
            let pricing = hotel_pricing.unwrap_or(config.costs.hotel_pricing);
            let summary = TripSummary::for_trip(&trip, pricing);
            match format {
                Format::Text => printer.print_summary(&trip, &summary),
                Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            }
        }

        Command::Items { file, kind } => {
            let trip = load_trip(&file, &normalizer)?;
            let items = items_of_kind(&trip, kind);
            printer.print_items(kind, &items);
        }

        Command::Add { file, item, date } => {
            let mut trip = load_trip(&file, &normalizer)?;
            let content = std::fs::read_to_string(&item)
                .with_context(|| format!("failed to read {}", item.display()))?;
            let value: serde_json::Value =
                serde_json::from_str(&content).context("item file is not valid JSON")?;
            let item = record::decode_item(&value)
                .context("item must be a flight, hotel, transportation or attraction")?;

            if trip.find_item(item.id()).is_some() || trip.unscheduled.contains_id(item.id()) {
                anyhow::bail!("an item with id {} is already on this trip", item.id());
            }

            let date = date.unwrap_or_else(|| normalizer.anchor_date(&item));
            if date < trip.start_date || date > trip.end_date {
                println!(
                    "Note: {} is outside the trip dates ({} to {})",
                    date, trip.start_date, trip.end_date
                );
            }
            let id = item.id().to_string();
            trip.add_item(item, date, &normalizer);
            save_trip(&file, &trip)?;
            println!("Added {} on {}", id, date);
        }

        Command::Remove { file, id } => {
            let mut trip = load_trip(&file, &normalizer)?;
            let removed = trip.remove_item(&id);
            save_trip(&file, &trip)?;
            if removed == 0 {
                println!("No item with id {}", id);
            } else {
                println!("Removed {}", id);
            }
        }

        Command::Status {
            file,
            status,
            force,
        } => {
            let mut trip = load_trip(&file, &normalizer)?;
            let previous = trip.status;
            if force {
                trip.set_status(status);
            } else {
                trip.transition_to(status)
                    .context("use --force to override the status lifecycle")?;
            }
            save_trip(&file, &trip)?;
            println!("Status: {} -> {}", previous, status);
        }
    }

    Ok(())
}

fn load_trip(path: &Path, normalizer: &Normalizer) -> Result<Trip> {
    let raw = record::load(path).with_context(|| format!("failed to read {}", path.display()))?;
    Trip::from_record(raw, normalizer)
        .with_context(|| format!("invalid trip record {}", path.display()))
}

fn save_trip(path: &Path, trip: &Trip) -> Result<()> {
    let raw = TripRecord::from_trip(trip).context("failed to encode trip")?;
    record::save(path, &raw).with_context(|| format!("failed to write {}", path.display()))
}
