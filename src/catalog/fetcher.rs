use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::transport::Transport;
use crate::error::FetchError;

/// Bounded linear backoff: the delay before attempt `n` is `base_delay × (n - 1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.base_delay * attempt.saturating_sub(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

/// GET + JSON decode with retries on transport failures and non-2xx statuses.
///
/// Decoding errors are returned immediately; a malformed payload will not
/// change on retry.
pub struct Fetcher<T> {
    transport: T,
    policy: RetryPolicy,
    sleep: Box<dyn Fn(Duration)>,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Replace the sleep used between attempts
    pub fn with_sleep(mut self, sleep: impl Fn(Duration) + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get_json<D: DeserializeOwned>(&self, url: &str) -> Result<D, FetchError> {
        let body = self.get_with_retries(url)?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn get_with_retries(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut attempt = 1;
        loop {
            let failure = match self.transport.get(url) {
                Ok(response) if response.is_success() => return Ok(response.body),
                Ok(response) if response.status == 404 => FetchError::NotFound {
                    url: url.to_string(),
                },
                Ok(response) => FetchError::Status {
                    url: url.to_string(),
                    status: response.status,
                },
                Err(message) => FetchError::Network {
                    url: url.to_string(),
                    message,
                },
            };

            if attempt >= self.policy.attempts {
                return Err(failure);
            }

            attempt += 1;
            let delay = self.policy.delay_before(attempt);
            debug!(url, attempt, delay_ms = delay.as_millis() as u64, error = %failure, "retrying");
            (self.sleep)(delay);
        }
    }
}
