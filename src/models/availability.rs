//! Wire types for the innroad availability feed.
//!
//! These mirror the provider payload one-to-one. Fields the feed sometimes
//! omits are optional or defaulted so a single malformed rate entry can be
//! skipped without failing the whole chunk.

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rule type id the feed uses for minimum-stay rules.
pub const RULE_TYPE_MIN_STAY: i64 = 1;

/// One cabin (room class) as returned by the availability endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinAvailability {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub max_persons: u32,
    #[serde(default)]
    pub rates: Vec<RateDay>,
}

/// Per-day rate entry inside a cabin record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateDay {
    #[serde(default)]
    pub effective_date: Option<String>,
    #[serde(default)]
    pub is_room_available: bool,
    #[serde(default)]
    pub base_after_tax: Option<RateAmount>,
    #[serde(default)]
    pub rules: Vec<RateRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateAmount {
    pub value: f64,
    #[serde(default)]
    pub currency_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRule {
    pub rule_type_id: i64,
    pub rule_value: u32,
}

impl RateDay {
    /// Calendar day this entry applies to. The feed sends a full ISO
    /// timestamp; only the leading `YYYY-MM-DD` is significant.
    pub fn effective_day(&self) -> Option<NaiveDate> {
        let raw = self.effective_date.as_deref()?;
        let day = raw.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    /// Minimum-stay rule in effect for this day, defaulting to one night.
    pub fn min_stay(&self) -> u32 {
        self.rules
            .iter()
            .find(|rule| rule.rule_type_id == RULE_TYPE_MIN_STAY)
            .map(|rule| rule.rule_value.max(1))
            .unwrap_or(1)
    }
}

/// Parse one chunk body into cabin records, skipping elements that do not
/// match the expected shape instead of failing the chunk.
pub fn parse_cabins(raw: &Value) -> Vec<CabinAvailability> {
    let Some(entries) = raw.as_array() else {
        warn!("availability chunk body was not a JSON array; ignoring it");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value(entry.clone()) {
            Ok(cabin) => Some(cabin),
            Err(err) => {
                warn!("skipping malformed cabin record: {err}");
                None
            }
        })
        .collect()
}
