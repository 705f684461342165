//! Bounded retry for flaky network dependencies.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{AdminError, AdminResult};

/// Default attempt budget for relay-service calls. The service is a flaky
/// HTTP dependency; transient 5xx/timeouts are expected.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

const DEFAULT_DELAY: Duration = Duration::from_secs(5);

/// Bounded retry with a fixed inter-attempt delay and a call-site label.
///
/// Stateless; instantiate one per call site. The policy provides no mutual
/// exclusion: concurrent callers each get their own attempt sequence.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    label: String,
    max_attempts: usize,
    delay: Duration,
}

impl RetryPolicy {
    /// A policy with the default inter-attempt delay.
    pub fn new(label: impl Into<String>, max_attempts: usize) -> Self {
        assert!(max_attempts >= 1);
        Self {
            label: label.into(),
            max_attempts,
            delay: DEFAULT_DELAY,
        }
    }

    /// Override the fixed delay between attempts. There is no backoff
    /// growth; the configured delay applies between every pair of attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Run `op` until it succeeds or the attempt budget is spent. The final
    /// error is wrapped so the label shows up in the rendered error chain.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> AdminResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AdminResult<T>>,
    {
        let mut last_err = None;

        for attempt in 0..self.max_attempts {
            debug!(attempt, label = %self.label, "dispatching attempt");
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(
                        attempt,
                        retries_remaining = self.max_attempts - attempt - 1,
                        error = %e,
                        label = %self.label,
                        "attempt failed",
                    );
                    last_err = Some(e);
                }
            }
            if attempt + 1 < self.max_attempts {
                sleep(self.delay).await;
            }
        }

        Err(AdminError::RetriesExhausted {
            label: self.label.clone(),
            attempts: self.max_attempts,
            source: Box::new(last_err.unwrap()),
        })
    }
}
