//! Quote - one motivational quote from a JSON endpoint
//!
//! Each attempt is bounded by a timeout; failed attempts are retried after a
//! fixed delay. Only the final failure is reported to the page, as a single
//! user-facing message.

use std::fmt::Display;
use std::future::Future;
use std::pin::pin;

use futures::future::{Either, select};
use gloo_timers::future::TimeoutFuture;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::{QUOTE_ERROR_MESSAGE, QuoteConfig, RetryPolicy};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuoteResponse {
    pub quote: String,
    pub author: String,
    pub id: u64,
}

/// Failure of a single attempt
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("timed out after {0}ms")]
    Timeout(u32),
}

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("{message}", message = QUOTE_ERROR_MESSAGE)]
    Unavailable {
        #[source]
        source: FetchError,
    },
}

/// Resolve `fut`, or fail with `FetchError::Timeout` if `timer` finishes first
pub async fn with_timeout<T, F, S>(fut: F, timer: S, timeout_ms: u32) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
    S: Future<Output = ()>,
{
    match select(pin!(fut), pin!(timer)).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(FetchError::Timeout(timeout_ms)),
    }
}

/// Run `op` until it succeeds or the policy runs out, sleeping between
/// attempts. `op` gets the 1-based attempt number. Returns the last error.
pub async fn with_retry<T, E, Op, Fut, Sleep, SleepFut>(
    policy: RetryPolicy,
    mut op: Op,
    mut sleep: Sleep,
) -> Result<T, E>
where
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    Sleep: FnMut(u32) -> SleepFut,
    SleepFut: Future<Output = ()>,
    E: Display,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.attempts() => {
                warn!(attempt, %err, "attempt failed, retrying in {}ms", policy.delay_ms);
                sleep(policy.delay_ms).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// One quote fetch under `policy`: each attempt races `timer(timeout_ms)`,
/// and the same timer sleeps between attempts. The last failure becomes
/// `QuoteError::Unavailable`.
pub async fn fetch_with_policy<Fetch, FetchFut, Timer, TimerFut>(
    policy: RetryPolicy,
    timeout_ms: u32,
    mut fetch: Fetch,
    timer: Timer,
) -> Result<String, QuoteError>
where
    Fetch: FnMut() -> FetchFut,
    FetchFut: Future<Output = Result<QuoteResponse, FetchError>>,
    Timer: Fn(u32) -> TimerFut,
    TimerFut: Future<Output = ()>,
{
    let result = with_retry(
        policy,
        |_attempt| with_timeout(fetch(), timer(timeout_ms), timeout_ms),
        &timer,
    )
    .await;

    match result {
        Ok(response) => {
            debug!(id = response.id, author = %response.author, "quote loaded");
            Ok(response.quote)
        }
        Err(source) => {
            error!(%source, attempts = policy.attempts(), "quote fetch failed");
            Err(QuoteError::Unavailable { source })
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuoteClient {
    http: reqwest::Client,
    config: QuoteConfig,
}

impl Default for QuoteClient {
    fn default() -> Self {
        Self::new(QuoteConfig::default())
    }
}

impl QuoteClient {
    pub fn new(config: QuoteConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    pub async fn random_quote(&self) -> Result<String, QuoteError> {
        fetch_with_policy(
            self.config.retry,
            self.config.timeout_ms,
            || {
                debug!(url = %self.config.url, "fetching quote");
                self.fetch_once()
            },
            TimeoutFuture::new,
        )
        .await
    }

    async fn fetch_once(&self) -> Result<QuoteResponse, FetchError> {
        let response = self.http.get(&self.config.url).send().await?.error_for_status()?;
        Ok(response.json::<QuoteResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use futures::executor::block_on;
    use futures::future::{pending, ready};

    const POLICY: RetryPolicy = RetryPolicy { retries: 2, delay_ms: 1000 };

    #[test]
    fn parses_response_body() {
        let body = r#"{"id":42,"quote":"Stay hungry.","author":"Someone"}"#;
        let parsed: QuoteResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.quote, "Stay hungry.");
        assert_eq!(parsed.id, 42);
    }

    #[test]
    fn error_message_is_user_facing() {
        let err = QuoteError::Unavailable { source: FetchError::Timeout(5000) };
        assert_eq!(err.to_string(), QUOTE_ERROR_MESSAGE);
    }

    #[test]
    fn first_success_does_not_sleep() {
        let mut sleeps = Vec::new();
        let result: Result<u32, String> = block_on(with_retry(
            POLICY,
            |attempt| ready(Ok(attempt)),
            |ms| {
                sleeps.push(ms);
                ready(())
            },
        ));
        assert_eq!(result, Ok(1));
        assert!(sleeps.is_empty());
    }

    #[test]
    fn retries_with_fixed_delay_until_success() {
        let mut sleeps = Vec::new();
        let result: Result<u32, String> = block_on(with_retry(
            POLICY,
            |attempt| ready(if attempt < 3 { Err(format!("attempt {attempt}")) } else { Ok(attempt) }),
            |ms| {
                sleeps.push(ms);
                ready(())
            },
        ));
        assert_eq!(result, Ok(3));
        assert_eq!(sleeps, vec![1000, 1000]);
    }

    #[test]
    fn gives_up_after_all_attempts() {
        let mut calls = 0;
        let result: Result<(), String> = block_on(with_retry(
            POLICY,
            |attempt| {
                calls += 1;
                ready(Err(format!("attempt {attempt}")))
            },
            |_| ready(()),
        ));
        assert_eq!(result, Err("attempt 3".to_string()));
        assert_eq!(calls, 3);
    }

    #[test]
    fn no_retries_means_one_attempt() {
        let mut calls = 0;
        let policy = RetryPolicy { retries: 0, delay_ms: 1000 };
        let result: Result<(), String> = block_on(with_retry(
            policy,
            |_| {
                calls += 1;
                ready(Err("down".to_string()))
            },
            |_| ready(()),
        ));
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn timer_wins_over_stalled_request() {
        let result = block_on(with_timeout(pending::<Result<u32, FetchError>>(), ready(()), 5000));
        assert!(matches!(result, Err(FetchError::Timeout(5000))));
    }

    #[test]
    fn ready_request_beats_timer() {
        let result = block_on(with_timeout(ready(Ok::<_, FetchError>(7)), pending::<()>(), 5000));
        assert_eq!(result.unwrap(), 7);
    }

    fn sample() -> QuoteResponse {
        QuoteResponse { quote: "Stay hungry.".into(), author: "Someone".into(), id: 42 }
    }

    #[test]
    fn exhausted_attempts_report_user_message() {
        let mut calls = 0;
        let result = block_on(fetch_with_policy(
            POLICY,
            5000,
            || {
                calls += 1;
                ready(Err(FetchError::Timeout(5000)))
            },
            |_| ready(()),
        ));
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), QUOTE_ERROR_MESSAGE);
        assert_eq!(calls, 3);
        let QuoteError::Unavailable { source } = err;
        assert!(matches!(source, FetchError::Timeout(5000)));
    }

    #[test]
    fn stalled_attempts_time_out_then_give_up() {
        let mut calls = 0;
        let result = block_on(fetch_with_policy(
            POLICY,
            5000,
            || {
                calls += 1;
                pending::<Result<QuoteResponse, FetchError>>()
            },
            |_| ready(()),
        ));
        assert_eq!(result.unwrap_err().to_string(), QUOTE_ERROR_MESSAGE);
        assert_eq!(calls, 3);
    }

    #[test]
    fn success_yields_quote_text() {
        let result = block_on(fetch_with_policy(POLICY, 5000, || ready(Ok(sample())), |_| pending::<()>()));
        assert_eq!(result.unwrap(), "Stay hungry.");
    }

    #[test]
    fn recovers_on_a_later_attempt() {
        let mut calls = 0;
        let result = block_on(fetch_with_policy(
            POLICY,
            5000,
            || {
                calls += 1;
                ready(if calls < 2 { Err(FetchError::Timeout(5000)) } else { Ok(sample()) })
            },
            |_| ready(()),
        ));
        assert_eq!(result.unwrap(), "Stay hungry.");
        assert_eq!(calls, 2);
    }
}
