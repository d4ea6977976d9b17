//! Short-gap extraction.
//!
//! Walks each cabin calendar in season order and collects maximal runs of
//! consecutive available nights. Runs of one to three nights become [`Gap`]s;
//! longer runs are ordinary vacancy and are dropped. The season edge closes a
//! run the same way a booked day does.

use chrono::NaiveDate;
use log::debug;

use crate::calendar::SeasonCalendars;
use crate::models::gap::{CabinMeta, DayRecord, Gap};
use crate::season::{add_days, SeasonWindow};
use crate::utils::fmt::round_cents;

/// Longest run of free nights still reported as a gap.
pub const MAX_GAP_NIGHTS: u32 = 3;

/// Party size prefilled into every booking link.
const BOOKING_ADULTS: u32 = 2;
const BOOKING_CHILDREN: u32 = 0;

struct OpenRun {
    start: NaiveDate,
    first: DayRecord,
    nights: u32,
    total: f64,
}

/// Find every 1–3 night gap in the season, ordered by check-in date. Gaps
/// sharing a check-in keep the alphabetical cabin order of the calendars.
pub fn extract_gaps(
    window: &SeasonWindow,
    calendars: &SeasonCalendars,
    booking_base: &str,
) -> Vec<Gap> {
    let mut gaps = Vec::new();

    for (name, calendar) in &calendars.cabins {
        let Some(meta) = calendars.meta.get(name) else {
            debug!("no metadata for cabin {name}; skipping it");
            continue;
        };

        let mut open: Option<OpenRun> = None;
        for date in window.days() {
            let day = calendar.day(date).cloned().unwrap_or_default();
            if day.available {
                match open.as_mut() {
                    Some(run) => {
                        run.nights += 1;
                        run.total += day.rate;
                    }
                    None => {
                        open = Some(OpenRun {
                            start: date,
                            nights: 1,
                            total: day.rate,
                            first: day,
                        });
                    }
                }
            } else if let Some(run) = open.take() {
                close_run(&mut gaps, run, name, meta, booking_base);
            }
        }
        if let Some(run) = open.take() {
            close_run(&mut gaps, run, name, meta, booking_base);
        }
    }

    gaps.sort_by_key(|gap| gap.check_in);
    debug!(
        "extracted {} gaps across {} cabins",
        gaps.len(),
        calendars.cabins.len()
    );
    gaps
}

fn close_run(gaps: &mut Vec<Gap>, run: OpenRun, name: &str, meta: &CabinMeta, booking_base: &str) {
    if run.nights > MAX_GAP_NIGHTS {
        return;
    }

    let check_out = add_days(run.start, i64::from(run.nights));
    let booking_url = format!(
        "{booking_base}/room/{}?checkIn={}&checkOut={check_out}&adults={BOOKING_ADULTS}&children={BOOKING_CHILDREN}",
        meta.id, run.start
    );

    gaps.push(Gap {
        cabin: name.to_string(),
        cabin_id: meta.id,
        picture: meta.picture_url.clone(),
        max_guests: meta.max_guests,
        check_in: run.start,
        check_out,
        nights: run.nights,
        min_stay: run.first.min_stay,
        bookable: run.nights >= run.first.min_stay,
        nightly_rate: run.first.rate,
        total_rate: round_cents(run.total),
        currency: run.first.currency,
        booking_url,
    });
}
