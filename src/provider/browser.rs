//! Headful Chrome session against the booking widget.
//!
//! The widget only hands out a usable session token after its Turnstile
//! challenge is solved by a person in the visible window. This module opens
//! the grid page, watches network responses for the session header, and
//! doubles as a [`SessionProbe`]: passive signals first, then an active
//! session-status call once a token candidate exists.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::{self, EventResponseReceived};
use chromiumoxide::{Browser, BrowserConfig, Handler};
use futures::StreamExt;
use log::{debug, info, warn};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::config::{chrome_executable, ScrapeConfig};
use crate::provider::innroad::session_status;
use crate::provider::session::{ProbeOutcome, SessionProbe};
use crate::provider::{SessionToken, SESSION_HEADER, USER_AGENT};

/// What the response listener has observed so far.
#[derive(Default)]
struct SessionSignals {
    token: Option<String>,
    api_ok: bool,
}

pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    listener_task: JoinHandle<()>,
    signals: Arc<Mutex<SessionSignals>>,
    http: reqwest::Client,
    api_base: String,
}

impl BrowserSession {
    /// Launch Chrome, open the booking grid, and start watching responses.
    /// Returns once the page has loaded; authentication is still pending at
    /// that point.
    pub async fn launch(config: &ScrapeConfig) -> Result<Self> {
        let chrome = chrome_executable();
        info!("launching {} for {}", chrome.display(), config.grid_url);

        let browser_config = BrowserConfig::builder()
            .with_head()
            .chrome_executable(chrome)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--no-sandbox")
            .build()
            .map_err(|msg| anyhow!("invalid browser configuration: {msg}"))?;

        let (browser, handler) = Browser::launch(browser_config)
            .await
            .context("launching Chrome")?;
        let handler_task = spawn_handler_task(handler);

        let signals = Arc::new(Mutex::new(SessionSignals::default()));
        let page = browser
            .new_page("about:blank")
            .await
            .context("opening a browser tab")?;
        page.execute(network::EnableParams::default())
            .await
            .context("enabling network events")?;

        // The listener must be registered before navigation so the very
        // first widget responses are seen.
        let mut responses = page
            .event_listener::<EventResponseReceived>()
            .await
            .context("subscribing to network responses")?;
        let listener_task = tokio::spawn({
            let signals = Arc::clone(&signals);
            let api_base = config.api_base.clone();
            async move {
                while let Some(event) = responses.next().await {
                    record_response(&signals, &api_base, &event.response);
                }
            }
        });

        page.goto(config.grid_url.as_str())
            .await
            .context("navigating to the booking grid")?;
        timeout(config.page_load_timeout, page.wait_for_navigation())
            .await
            .map_err(|_| {
                anyhow!(
                    "the booking grid did not finish loading within {:?}",
                    config.page_load_timeout
                )
            })?
            .context("loading the booking grid")?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("building the session-status HTTP client")?;

        Ok(Self {
            browser,
            handler_task,
            listener_task,
            signals,
            http,
            api_base: config.api_base.clone(),
        })
    }

    /// Shut the browser down. Safe to call whether or not authentication
    /// succeeded.
    pub async fn close(mut self) {
        self.listener_task.abort();
        if let Err(err) = self.browser.close().await {
            warn!("browser close failed: {err}");
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();
    }
}

#[async_trait]
impl SessionProbe for BrowserSession {
    async fn poll(&mut self) -> Result<ProbeOutcome> {
        let (token, api_ok) = {
            let signals = self.signals.lock().unwrap();
            (signals.token.clone(), signals.api_ok)
        };

        let Some(token) = token else {
            return Ok(ProbeOutcome::Pending);
        };
        let token = SessionToken::new(token);

        if api_ok {
            return Ok(ProbeOutcome::Authenticated(token));
        }

        // A token candidate without authenticated traffic yet; ask the
        // booking engine directly.
        match session_status(&self.http, &self.api_base, &token).await {
            Ok(status) if status.is_authenticated_with_turnstile => {
                Ok(ProbeOutcome::Authenticated(token))
            }
            Ok(_) => Ok(ProbeOutcome::Pending),
            Err(err) => {
                debug!("session-status probe failed: {err:#}");
                Ok(ProbeOutcome::Pending)
            }
        }
    }
}

fn spawn_handler_task(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(err) = event {
                warn!("browser transport error: {err}");
            }
        }
    })
}

/// Update the shared signals from one network response: capture the session
/// header wherever it appears, and mark the gate as passed once any API call
/// other than the status check comes back 200.
fn record_response(
    signals: &Arc<Mutex<SessionSignals>>,
    api_base: &str,
    response: &network::Response,
) {
    let token = header_value(&response.headers, SESSION_HEADER);
    let api_ok = response.url.contains(api_base)
        && response.status == 200
        && !response.url.contains("session/status");

    if token.is_none() && !api_ok {
        return;
    }

    let mut state = signals.lock().unwrap();
    if let Some(value) = token {
        if state.token.is_none() {
            debug!("captured a session token candidate");
        }
        state.token = Some(value);
    }
    if api_ok && !state.api_ok {
        debug!("saw authenticated API traffic from {}", response.url);
        state.api_ok = true;
    }
}

/// Case-insensitive header lookup on a CDP header map.
fn header_value(headers: &network::Headers, name: &str) -> Option<String> {
    let map = serde_json::to_value(headers).ok()?;
    map.as_object()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, value)| value.as_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn response(url: &str, status: i64, headers: serde_json::Value) -> network::Response {
        serde_json::from_value(json!({
            "url": url,
            "status": status,
            "statusText": "OK",
            "headers": headers,
            "mimeType": "application/json",
            "charset": "utf-8",
            "connectionReused": false,
            "connectionId": 1,
            "encodedDataLength": 0,
            "securityState": "secure",
        }))
        .unwrap()
    }

    const API: &str = "https://be-booking-engine-api.innroad.com";

    #[test]
    fn captures_the_session_header_case_insensitively() {
        let signals = Arc::new(Mutex::new(SessionSignals::default()));
        let resp = response(
            "https://widget.example/grid/",
            200,
            json!({ "Vnd-Innroad-Booking-Engine-Session": "tok-1" }),
        );

        record_response(&signals, API, &resp);

        let state = signals.lock().unwrap();
        assert_eq!(state.token.as_deref(), Some("tok-1"));
        assert!(!state.api_ok);
    }

    #[test]
    fn a_status_check_response_does_not_count_as_authenticated_traffic() {
        let signals = Arc::new(Mutex::new(SessionSignals::default()));
        let resp = response(&format!("{API}/session/status"), 200, json!({}));

        record_response(&signals, API, &resp);

        assert!(!signals.lock().unwrap().api_ok);
    }

    #[test]
    fn a_successful_api_response_marks_the_gate_as_passed() {
        let signals = Arc::new(Mutex::new(SessionSignals::default()));
        let resp = response(
            &format!("{API}/availability?startDate=2026-05-11&endDate=2026-05-31"),
            200,
            json!({}),
        );

        record_response(&signals, API, &resp);

        assert!(signals.lock().unwrap().api_ok);
    }

    #[test]
    fn non_200_api_responses_are_ignored() {
        let signals = Arc::new(Mutex::new(SessionSignals::default()));
        let resp = response(&format!("{API}/availability"), 403, json!({}));

        record_response(&signals, API, &resp);

        let state = signals.lock().unwrap();
        assert!(!state.api_ok);
        assert_eq!(state.token, None);
    }
}
