//! Bounded wait for the booking widget's authentication gate.
//!
//! The gate flips only after a person solves the Turnstile challenge in the
//! visible browser window, so all this module can do is poll at a fixed
//! interval until a session token shows up or the attempt budget runs out.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use thiserror::Error;

use crate::provider::SessionToken;

/// One observation of the authentication gate.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Authenticated(SessionToken),
    Pending,
}

/// Source of [`ProbeOutcome`]s, checked once per poll interval.
#[async_trait]
pub trait SessionProbe: Send {
    async fn poll(&mut self) -> Result<ProbeOutcome>;
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no authenticated session after {attempts} checks ({waited:?}); was the Turnstile solved?")]
    AuthTimeout { attempts: u32, waited: Duration },
    #[error(transparent)]
    Probe(#[from] anyhow::Error),
}

/// Poll `probe` every `interval` until it reports an authenticated session,
/// giving up after `max_attempts` checks.
pub async fn await_session<P: SessionProbe>(
    probe: &mut P,
    max_attempts: u32,
    interval: Duration,
) -> Result<SessionToken, SessionError> {
    for attempt in 1..=max_attempts {
        tokio::time::sleep(interval).await;
        match probe.poll().await? {
            ProbeOutcome::Authenticated(token) => {
                info!("session authenticated after {attempt} checks");
                return Ok(token);
            }
            ProbeOutcome::Pending => {
                debug!("session not ready ({attempt}/{max_attempts})");
            }
        }
    }

    Err(SessionError::AuthTimeout {
        attempts: max_attempts,
        waited: interval * max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::collections::VecDeque;

    struct ScriptedProbe {
        outcomes: VecDeque<Result<ProbeOutcome>>,
    }

    impl ScriptedProbe {
        fn new(outcomes: Vec<Result<ProbeOutcome>>) -> Self {
            Self {
                outcomes: outcomes.into(),
            }
        }
    }

    #[async_trait]
    impl SessionProbe for ScriptedProbe {
        async fn poll(&mut self) -> Result<ProbeOutcome> {
            self.outcomes
                .pop_front()
                .unwrap_or(Ok(ProbeOutcome::Pending))
        }
    }

    fn token() -> SessionToken {
        SessionToken::new("tok-123")
    }

    #[tokio::test]
    async fn returns_the_token_once_the_gate_opens() {
        let mut probe = ScriptedProbe::new(vec![
            Ok(ProbeOutcome::Pending),
            Ok(ProbeOutcome::Pending),
            Ok(ProbeOutcome::Authenticated(token())),
        ]);

        let got = await_session(&mut probe, 10, Duration::from_millis(1))
            .await
            .unwrap();
        assert_eq!(got, token());
        assert!(probe.outcomes.is_empty());
    }

    #[tokio::test]
    async fn gives_up_after_the_attempt_budget() {
        let mut probe = ScriptedProbe::new(vec![]);

        let err = await_session(&mut probe, 3, Duration::from_millis(1))
            .await
            .unwrap_err();
        match err {
            SessionError::AuthTimeout { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("expected AuthTimeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn a_probe_error_aborts_the_wait() {
        let mut probe = ScriptedProbe::new(vec![
            Ok(ProbeOutcome::Pending),
            Err(anyhow!("transport dropped")),
        ]);

        let err = await_session(&mut probe, 10, Duration::from_millis(1))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Probe(_)));
        assert!(err.to_string().contains("transport dropped"));
    }
}
