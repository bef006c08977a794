//! Day bucketer: spreads a trip's items over its calendar days.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::anchor::Normalizer;
use crate::types::{DaySchedule, ItemCollections, TripItem};

/// Every calendar day from `start` to `end`, inclusive. Empty if `start > end`.
pub fn trip_days(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

/// Build one [`DaySchedule`] per day of `[start, end]`.
///
/// Days with nothing on them are still present. Items whose anchor date falls
/// outside the range are dropped. Within a day, items keep scan order
/// (flights, hotels, transportation, attractions); ordering by time is left to
/// [`sort_day`] and the day renderer.
pub fn build_schedule(
    start: NaiveDate,
    end: NaiveDate,
    collections: &ItemCollections,
    normalizer: &Normalizer,
) -> Vec<DaySchedule> {
    bucket_items(start, end, collections.items(), normalizer)
}

/// Same as [`build_schedule`] over an already flattened item list.
pub fn bucket_items(
    start: NaiveDate,
    end: NaiveDate,
    items: impl IntoIterator<Item = TripItem>,
    normalizer: &Normalizer,
) -> Vec<DaySchedule> {
    if start > end {
        tracing::warn!(%start, %end, "Trip ends before it starts, schedule is empty");
        return Vec::new();
    }

    let mut buckets: BTreeMap<NaiveDate, Vec<TripItem>> =
        trip_days(start, end).map(|day| (day, Vec::new())).collect();

    let mut dropped = 0usize;
    for item in items {
        let date = normalizer.anchor_date(&item);
        match buckets.get_mut(&date) {
            Some(bucket) => bucket.push(item),
            None => {
                tracing::debug!(
                    item_id = item.id(),
                    kind = %item.kind(),
                    %date,
                    "Item falls outside trip dates, not scheduled"
                );
                dropped += 1;
            }
        }
    }

    let days: Vec<DaySchedule> = buckets
        .into_iter()
        .map(|(date, items)| DaySchedule { date, items })
        .collect();

    tracing::debug!(
        %start,
        %end,
        days = days.len(),
        dropped,
        "Built trip schedule"
    );

    days
}

/// Order a day's items by anchor time of day. Ties keep their current order.
pub fn sort_day(day: &mut DaySchedule, normalizer: &Normalizer) {
    // sort_by_key is stable
    day.items.sort_by_key(|item| normalizer.anchor(item).time);
}

/// Order days by date. Ties keep their current order.
pub fn sort_days(days: &mut [DaySchedule]) {
    days.sort_by_key(|day| day.date);
}

/// Insert empty days for any gap in `[start, end]` and order by date.
///
/// Used when a stored schedule is loaded, so the one-day-per-date shape holds
/// even if the stored copy skipped empty days. Days outside the range are kept.
pub fn fill_missing_days(days: &mut Vec<DaySchedule>, start: NaiveDate, end: NaiveDate) {
    let missing: Vec<NaiveDate> = trip_days(start, end)
        .filter(|date| !days.iter().any(|day| day.date == *date))
        .collect();
    if !missing.is_empty() {
        tracing::debug!(count = missing.len(), "Filling empty days in stored schedule");
    }
    days.extend(missing.into_iter().map(DaySchedule::empty));
    sort_days(days);
}
