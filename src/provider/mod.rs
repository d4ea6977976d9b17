//! Availability providers.
//!
//! The scrape pipeline only needs "give me the availability payload for a
//! date range"; everything about how that payload is obtained (browser
//! session, Turnstile gate, vendor API) stays behind [`AvailabilityProvider`].

pub mod browser;
pub mod innroad;
pub mod session;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{info, warn};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::models::availability::CabinAvailability;
use crate::season::SeasonWindow;

pub use browser::BrowserSession;
pub use innroad::InnroadClient;
pub use session::{await_session, ProbeOutcome, SessionError, SessionProbe};

/// Response header the booking engine uses to hand out its session token.
pub const SESSION_HEADER: &str = "vnd-innroad-booking-engine-session";

/// Browser-like user agent sent on direct API calls.
pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Opaque session credential captured from the booking widget.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    // The token is a credential; keep it out of logs and error chains.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(redacted)")
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("availability request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("availability request for {start} → {end} returned status {status}")]
    Status {
        status: u16,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("availability response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One fetched month chunk: the raw payload for the diagnostic snapshot plus
/// the parsed cabin records for the pipeline.
#[derive(Debug, Clone)]
pub struct ChunkData {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub raw: Value,
    pub cabins: Vec<CabinAvailability>,
}

#[async_trait]
pub trait AvailabilityProvider: Send + Sync {
    async fn fetch_chunk(&self, start: NaiveDate, end: NaiveDate)
        -> Result<ChunkData, ProviderError>;
}

/// Fetch every month chunk of the season concurrently. Failed chunks are
/// logged and dropped so a partial season still produces a report.
pub async fn fetch_season<P>(provider: &P, window: &SeasonWindow) -> Vec<ChunkData>
where
    P: AvailabilityProvider + ?Sized,
{
    let chunks = window.month_chunks();
    let requests = chunks
        .iter()
        .map(|chunk| provider.fetch_chunk(chunk.start(), chunk.end()));
    let results = futures::future::join_all(requests).await;

    let mut fetched = Vec::new();
    for (chunk, result) in chunks.iter().zip(results) {
        match result {
            Ok(data) => {
                info!("  {} → {} ✓ ({} cabins)", chunk.start(), chunk.end(), data.cabins.len());
                fetched.push(data);
            }
            Err(err) => {
                warn!("  {} → {} FAILED: {err}", chunk.start(), chunk.end());
            }
        }
    }
    fetched
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Mutex;

    /// Serves canned chunk results and records the ranges it was asked for.
    struct CannedProvider {
        calls: Mutex<Vec<(NaiveDate, NaiveDate)>>,
        fail_on: Option<NaiveDate>,
    }

    impl CannedProvider {
        fn new(fail_on: Option<NaiveDate>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on,
            }
        }
    }

    #[async_trait]
    impl AvailabilityProvider for CannedProvider {
        async fn fetch_chunk(
            &self,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<ChunkData, ProviderError> {
            self.calls.lock().unwrap().push((start, end));
            if self.fail_on == Some(start) {
                return Err(ProviderError::Status { status: 503, start, end });
            }
            let raw = json!([{ "id": 1, "name": "Cabin", "rates": [] }]);
            Ok(ChunkData {
                start,
                end,
                cabins: crate::models::availability::parse_cabins(&raw),
                raw,
            })
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn fetches_every_month_chunk_of_the_window() {
        let window = SeasonWindow::new(date(2026, 5, 11), date(2026, 7, 4)).unwrap();
        let provider = CannedProvider::new(None);

        let fetched = fetch_season(&provider, &window).await;

        assert_eq!(fetched.len(), 3);
        let calls = provider.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                (date(2026, 5, 11), date(2026, 5, 31)),
                (date(2026, 6, 1), date(2026, 6, 30)),
                (date(2026, 7, 1), date(2026, 7, 4)),
            ]
        );
    }

    #[tokio::test]
    async fn a_failed_chunk_is_dropped_not_fatal() {
        let window = SeasonWindow::new(date(2026, 5, 11), date(2026, 7, 4)).unwrap();
        let provider = CannedProvider::new(Some(date(2026, 6, 1)));

        let fetched = fetch_season(&provider, &window).await;

        let ranges: Vec<(NaiveDate, NaiveDate)> =
            fetched.iter().map(|c| (c.start, c.end)).collect();
        assert_eq!(
            ranges,
            vec![
                (date(2026, 5, 11), date(2026, 5, 31)),
                (date(2026, 7, 1), date(2026, 7, 4)),
            ]
        );
    }

    #[test]
    fn the_session_token_never_prints_its_value() {
        let token = SessionToken::new("very-secret-session-token");
        assert_eq!(format!("{token:?}"), "SessionToken(redacted)");
    }
}
