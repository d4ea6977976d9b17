//! Direct client for the innroad booking-engine API.
//!
//! Requests reuse the session token captured in the browser; the API accepts
//! them from any HTTP client once the token has passed the Turnstile gate.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::models::availability::parse_cabins;
use crate::provider::{
    AvailabilityProvider, ChunkData, ProviderError, SessionToken, SESSION_HEADER, USER_AGENT,
};

pub struct InnroadClient {
    http: reqwest::Client,
    api_base: String,
    token: SessionToken,
}

impl InnroadClient {
    pub fn new(api_base: impl Into<String>, token: SessionToken) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("building the availability HTTP client")?;
        Ok(Self {
            http,
            api_base: api_base.into(),
            token,
        })
    }
}

#[async_trait]
impl AvailabilityProvider for InnroadClient {
    async fn fetch_chunk(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ChunkData, ProviderError> {
        let url = availability_url(&self.api_base, start, end);
        debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .header("Accept-Language", "en-US")
            .header(SESSION_HEADER, self.token.as_str())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                start,
                end,
            });
        }

        let body = response.text().await?;
        let raw: Value = serde_json::from_str(&body)?;
        let cabins = parse_cabins(&raw);
        Ok(ChunkData {
            start,
            end,
            raw,
            cabins,
        })
    }
}

fn availability_url(api_base: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!("{api_base}/availability?startDate={start}&endDate={end}")
}

/// Authentication state of a captured session, as the booking engine reports
/// it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionStatus {
    #[serde(default)]
    pub is_authenticated_with_turnstile: bool,
}

/// Ask the booking engine whether `token` has passed the Turnstile gate.
pub(crate) async fn session_status(
    http: &reqwest::Client,
    api_base: &str,
    token: &SessionToken,
) -> Result<SessionStatus> {
    let url = format!("{api_base}/session/status");
    let response = http
        .get(&url)
        .header(SESSION_HEADER, token.as_str())
        .send()
        .await
        .context("requesting session status")?;
    response
        .json::<SessionStatus>()
        .await
        .context("decoding session status")
}
