//! Gap-night finder for a seasonal cabin property: pulls availability from
//! the innroad booking widget, folds it into per-cabin season calendars, and
//! reports every short vacancy between reservations.

pub mod calendar;
pub mod config;
pub mod gaps;
pub mod models;
pub mod output;
pub mod provider;
pub mod report;
pub mod season;
pub mod stats;
pub mod utils;
