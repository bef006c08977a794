//! Trip mutations. Every one of them bumps `updated_at`.

use chrono::{NaiveDate, Utc};

use super::anchor::Normalizer;
use super::schedule::{bucket_items, build_schedule, sort_day, sort_days};
use crate::error::{Error, Result};
use crate::record::UnscheduledItems;
use crate::types::{DaySchedule, ItemCollections, Trip, TripItem, TripStatus};

impl Trip {
    /// A new trip in `planning` with one empty day per date.
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidDateRange { start, end });
        }
        let now = Utc::now();
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            destinations: Vec::new(),
            start_date: start,
            end_date: end,
            status: TripStatus::Planning,
            days: build_schedule(start, end, &ItemCollections::default(), &Normalizer::utc()),
            unscheduled: UnscheduledItems::default(),
            budget: None,
            notes: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Put `item` on the day for `date`, creating the day if needed.
    ///
    /// The day is re-sorted by anchor time and the days by date.
    pub fn add_item(&mut self, item: TripItem, date: NaiveDate, normalizer: &Normalizer) {
        tracing::debug!(
            trip_id = %self.id,
            item_id = item.id(),
            kind = %item.kind(),
            %date,
            "Adding item"
        );

        let index = match self.days.iter().position(|day| day.date == date) {
            Some(index) => index,
            None => {
                self.days.push(DaySchedule::empty(date));
                self.days.len() - 1
            }
        };

        let day = &mut self.days[index];
        day.items.push(item);
        sort_day(day, normalizer);
        sort_days(&mut self.days);
        self.touch();
    }

    /// Remove every item with this id. Unknown ids are a no-op.
    ///
    /// Returns how many items were removed.
    pub fn remove_item(&mut self, item_id: &str) -> usize {
        let mut removed = 0;
        for day in &mut self.days {
            let before = day.items.len();
            day.items.retain(|item| item.id() != item_id);
            removed += before - day.items.len();
        }
        if removed == 0 {
            tracing::debug!(trip_id = %self.id, item_id, "No item to remove");
        }
        self.touch();
        removed
    }

    /// Set the status without checking the lifecycle.
    pub fn set_status(&mut self, status: TripStatus) {
        self.status = status;
        self.touch();
    }

    /// Set the status if the lifecycle allows it.
    pub fn transition_to(&mut self, status: TripStatus) -> Result<()> {
        if !self.status.can_transition_to(status) {
            return Err(Error::InvalidTransition {
                from: self.status,
                to: status,
            });
        }
        self.set_status(status);
        Ok(())
    }

    /// Move the trip to new dates and rebucket its items.
    ///
    /// Items whose anchor date falls outside the new range move to the
    /// unscheduled entries; unscheduled entries that decode and now fall
    /// inside it are put back on the schedule.
    pub fn set_dates(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        normalizer: &Normalizer,
    ) -> Result<()> {
        if start > end {
            return Err(Error::InvalidDateRange { start, end });
        }
        let mut items: Vec<TripItem> = self.items().cloned().collect();
        items.extend(self.unscheduled.take_decodable());
        let (kept, dropped): (Vec<TripItem>, Vec<TripItem>) =
            items.into_iter().partition(|item| {
                let date = normalizer.anchor_date(item);
                date >= start && date <= end
            });

        for item in &dropped {
            self.unscheduled.push(item)?;
        }
        self.start_date = start;
        self.end_date = end;
        self.days = bucket_items(start, end, kept, normalizer);

        if !dropped.is_empty() {
            tracing::warn!(
                trip_id = %self.id,
                dropped = dropped.len(),
                "Items fell outside new trip dates, keeping them unscheduled"
            );
        }
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_timestamp;
    use crate::types::{Attraction, AttractionCategory, Location};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    fn attraction(id: &str, start: &str) -> TripItem {
        TripItem::Attraction(Attraction {
            id: id.to_string(),
            name: id.to_string(),
            location: Location::default(),
            category: AttractionCategory::Activity,
            start_date_time: parse_timestamp(start).unwrap(),
            duration: 60,
            cost: 5.0,
            rating: None,
            description: None,
            booking_required: false,
            booking_reference: None,
            opening_hours: vec![],
        })
    }

    fn sample_trip() -> Trip {
        let mut trip = Trip::new("Lisbon", date(13), date(15)).unwrap();
        let n = Normalizer::utc();
        trip.add_item(attraction("a1", "2025-11-13T10:00:00Z"), date(13), &n);
        trip.add_item(attraction("a2", "2025-11-13T08:00:00Z"), date(13), &n);
        trip.add_item(attraction("a3", "2025-11-14T09:00:00Z"), date(14), &n);
        trip.add_item(attraction("a4", "2025-11-15T09:00:00Z"), date(15), &n);
        trip.add_item(attraction("a5", "2025-11-15T07:00:00Z"), date(15), &n);
        trip
    }

    #[test]
    fn test_new_trip_has_empty_days() {
        let trip = Trip::new("Lisbon", date(13), date(15)).unwrap();
        assert_eq!(trip.status, TripStatus::Planning);
        assert_eq!(trip.days.len(), 3);
        assert_eq!(trip.duration_days(), 3);
        assert_eq!(trip.item_count(), 0);
        assert!(!trip.id.is_empty());
    }

    #[test]
    fn test_new_trip_rejects_reversed_dates() {
        let err = Trip::new("Lisbon", date(15), date(13)).unwrap_err();
        assert!(matches!(err, Error::InvalidDateRange { .. }));
    }

    #[test]
    fn test_add_item_sorts_day() {
        let trip = sample_trip();
        let ids: Vec<_> = trip.days[0].items.iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["a2", "a1"]);
        let ids: Vec<_> = trip.days[2].items.iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["a5", "a4"]);
    }

    #[test]
    fn test_add_item_creates_missing_day_in_order() {
        let mut trip = Trip::new("Lisbon", date(13), date(14)).unwrap();
        let before = trip.updated_at;
        trip.add_item(
            attraction("late", "2025-11-20T10:00:00Z"),
            date(20),
            &Normalizer::utc(),
        );
        trip.add_item(
            attraction("early", "2025-11-10T10:00:00Z"),
            date(10),
            &Normalizer::utc(),
        );
        let dates: Vec<_> = trip.days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(10), date(13), date(14), date(20)]);
        assert!(trip.updated_at >= before);
    }

    #[test]
    fn test_remove_unknown_item_is_noop() {
        let mut trip = sample_trip();
        let before = trip.updated_at;
        assert_eq!(trip.remove_item("nonexistent-id"), 0);
        assert_eq!(trip.item_count(), 5);
        assert!(trip.updated_at >= before);
    }

    #[test]
    fn test_remove_item() {
        let mut trip = sample_trip();
        assert_eq!(trip.remove_item("a3"), 1);
        assert_eq!(trip.item_count(), 4);
        assert!(trip.find_item("a3").is_none());
        // The day stays even when emptied
        assert_eq!(trip.days.len(), 3);
    }

    #[test]
    fn test_transition_to() {
        let mut trip = sample_trip();
        trip.transition_to(TripStatus::Booked).unwrap();
        trip.transition_to(TripStatus::InProgress).unwrap();
        trip.transition_to(TripStatus::Completed).unwrap();

        let err = trip.transition_to(TripStatus::Planning).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                from: TripStatus::Completed,
                to: TripStatus::Planning
            }
        ));

        // set_status is unchecked
        trip.set_status(TripStatus::Planning);
        assert_eq!(trip.status, TripStatus::Planning);
    }

    #[test]
    fn test_set_dates_rebuckets() {
        let mut trip = sample_trip();
        trip.set_dates(date(14), date(16), &Normalizer::utc()).unwrap();
        assert_eq!(trip.days.len(), 3);
        assert_eq!(trip.days[0].date, date(14));
        // a1 and a2 were on the 13th
        assert_eq!(trip.item_count(), 3);
        assert!(trip.unscheduled.contains_id("a1"));
        assert!(trip.unscheduled.contains_id("a2"));
        assert!(trip.set_dates(date(16), date(14), &Normalizer::utc()).is_err());
    }

    #[test]
    fn test_set_dates_back_restores_items() {
        let mut trip = sample_trip();
        let n = Normalizer::utc();
        trip.set_dates(date(15), date(15), &n).unwrap();
        assert_eq!(trip.item_count(), 2);
        assert_eq!(trip.unscheduled.len(), 3);

        trip.set_dates(date(13), date(15), &n).unwrap();
        assert_eq!(trip.item_count(), 5);
        assert!(trip.unscheduled.is_empty());
        let ids: Vec<_> = trip.days[0].items.iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["a2", "a1"]);
    }
}
