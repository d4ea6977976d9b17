//! Folds month-chunk responses into one dense per-cabin calendar.
//!
//! Chunk payloads overlap at month boundaries and may repeat cabins; the
//! fold keeps the first metadata seen per cabin and the last day record
//! seen per date, then fills every remaining season day with the default
//! (unavailable) record so downstream scans never branch on missing days.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;

use crate::models::availability::{CabinAvailability, RateAmount, RateDay};
use crate::models::gap::{CabinMeta, DayRecord};
use crate::season::SeasonWindow;

/// Dense availability calendar for a single cabin.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CabinCalendar {
    days: BTreeMap<NaiveDate, DayRecord>,
}

impl CabinCalendar {
    pub fn day(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days.get(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// All cabin calendars for one season, keyed by cabin name so iteration
/// order is alphabetical and stable across runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeasonCalendars {
    pub cabins: BTreeMap<String, CabinCalendar>,
    pub meta: BTreeMap<String, CabinMeta>,
}

/// Merge every fetched chunk into dense season calendars.
pub fn build_calendars(
    window: &SeasonWindow,
    chunks: &[Vec<CabinAvailability>],
) -> SeasonCalendars {
    let mut calendars = SeasonCalendars::default();
    let mut skipped = 0usize;

    for chunk in chunks {
        for cabin in chunk {
            calendars
                .meta
                .entry(cabin.name.clone())
                .or_insert_with(|| CabinMeta::from(cabin));
            let calendar = calendars.cabins.entry(cabin.name.clone()).or_default();

            for rate_day in &cabin.rates {
                let Some(date) = rate_day.effective_day() else {
                    skipped += 1;
                    continue;
                };
                let Some(amount) = &rate_day.base_after_tax else {
                    skipped += 1;
                    continue;
                };
                if !window.contains(date) {
                    skipped += 1;
                    continue;
                }
                calendar.days.insert(date, day_record(rate_day, amount));
            }
        }
    }

    for calendar in calendars.cabins.values_mut() {
        for date in window.days() {
            calendar.days.entry(date).or_default();
        }
    }

    if skipped > 0 {
        debug!("ignored {skipped} rate entries outside the season or without a usable date or amount");
    }
    debug!(
        "built calendars for {} cabins over {} days",
        calendars.cabins.len(),
        window.day_count()
    );

    calendars
}

fn day_record(rate_day: &RateDay, amount: &RateAmount) -> DayRecord {
    DayRecord {
        available: rate_day.is_room_available,
        rate: amount.value,
        currency: amount.currency_code.clone().unwrap_or_else(|| "USD".into()),
        min_stay: rate_day.min_stay(),
    }
}
