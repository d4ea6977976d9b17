//! Domain types for the gap-night pipeline.
//!
//! A gap is a short (1–3 night) stretch of consecutive available nights for
//! one cabin, bounded by unavailable days or the season edges. Gaps are
//! computed once per scrape run and never mutated afterwards; the viewer's
//! "handled" checklist is keyed by [`Gap::identity`] and stored separately.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::availability::CabinAvailability;

/// Dense per-day availability state for one cabin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub available: bool,
    pub rate: f64,
    pub currency: String,
    pub min_stay: u32,
}

impl Default for DayRecord {
    /// What a day the feed never mentioned looks like.
    fn default() -> Self {
        Self {
            available: false,
            rate: 0.0,
            currency: "USD".into(),
            min_stay: 1,
        }
    }
}

/// Read-only reference data for one cabin, keyed by cabin name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinMeta {
    pub id: i64,
    pub display_name: String,
    pub picture_url: String,
    pub max_guests: u32,
}

impl From<&CabinAvailability> for CabinMeta {
    fn from(cabin: &CabinAvailability) -> Self {
        Self {
            id: cabin.id,
            display_name: cabin.name.clone(),
            picture_url: cabin.picture.clone().unwrap_or_default(),
            max_guests: cabin.max_persons,
        }
    }
}

/// A maximal run of 1–3 consecutive available nights for one cabin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gap {
    pub cabin: String,
    pub cabin_id: i64,
    pub picture: String,
    pub max_guests: u32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub min_stay: u32,
    pub bookable: bool,
    pub nightly_rate: f64,
    pub total_rate: f64,
    pub currency: String,
    pub booking_url: String,
}

impl Gap {
    /// Stable identity used by the handled checklist: `cabin|checkIn`.
    pub fn identity(&self) -> String {
        format!("{}|{}", self.cabin, self.check_in)
    }
}

/// The sole artifact a run exports; serialized to `gaps.json` and embedded
/// into the HTML report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapReport {
    pub generated: DateTime<Utc>,
    pub season_start: NaiveDate,
    pub season_end: NaiveDate,
    pub total_gaps: usize,
    pub gaps: Vec<Gap>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample_gap() -> Gap {
        Gap {
            cabin: "Cabin 3 - Lakeside".into(),
            cabin_id: 118,
            picture: "https://img.example/cabin3.jpg".into(),
            max_guests: 4,
            check_in: NaiveDate::from_ymd_opt(2026, 5, 11).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 5, 13).unwrap(),
            nights: 2,
            min_stay: 1,
            bookable: true,
            nightly_rate: 189.0,
            total_rate: 378.0,
            currency: "USD".into(),
            booking_url: "https://example.com/room/118".into(),
        }
    }

    #[test]
    fn identity_is_cabin_and_check_in() {
        assert_eq!(sample_gap().identity(), "Cabin 3 - Lakeside|2026-05-11");
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = GapReport {
            generated: Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap(),
            season_start: NaiveDate::from_ymd_opt(2026, 5, 11).unwrap(),
            season_end: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            total_gaps: 1,
            gaps: vec![sample_gap()],
        };

        let json = serde_json::to_string(&report).unwrap();
        let back: GapReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn gap_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(sample_gap()).unwrap();
        assert_eq!(value["checkIn"], "2026-05-11");
        assert_eq!(value["checkOut"], "2026-05-13");
        assert_eq!(value["nightlyRate"], 189.0);
        assert_eq!(value["totalRate"], 378.0);
        assert_eq!(value["minStay"], 1);
        assert_eq!(value["maxGuests"], 4);
        assert_eq!(value["bookingUrl"], "https://example.com/room/118");
    }
}
