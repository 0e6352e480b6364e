//! Bounded exponential backoff
//!
//! Delay before retry `n` (1-based) is `min(initial * base^(n-1), max)` plus
//! an optional random jitter.

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use super::LlmError;
use crate::config::RetryConfig;

/// Retry policy applied to every LLM HTTP call
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    attempts: u32,
    exp_base: u32,
    initial_delay: Duration,
    max_delay: Duration,
    jitter: Duration,
    status_codes: Vec<u16>,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        debug!(?config, "RetryPolicy::from_config: called");
        Self {
            attempts: config.attempts.max(1),
            exp_base: config.exp_base.max(1),
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            jitter: Duration::from_millis(config.jitter_ms),
            status_codes: config.status_codes.clone(),
        }
    }

    /// Single attempt, no retries
    pub fn none() -> Self {
        Self::from_config(&RetryConfig {
            attempts: 1,
            ..RetryConfig::default()
        })
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Base delay before retry `retry` (1-based), without jitter
    pub fn base_delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1);
        let factor = u64::from(self.exp_base).saturating_pow(exponent);
        let millis = (self.initial_delay.as_millis() as u64).saturating_mul(factor);
        Duration::from_millis(millis).min(self.max_delay)
    }

    /// Delay before retry `retry` including jitter
    pub fn delay(&self, retry: u32) -> Duration {
        let base = self.base_delay(retry);
        if self.jitter.is_zero() {
            return base;
        }
        let extra = rand::rng().random_range(0..=self.jitter.as_millis() as u64);
        base + Duration::from_millis(extra)
    }

    /// Whether `err` should be retried under this policy
    pub fn should_retry(&self, err: &LlmError) -> bool {
        match err {
            LlmError::ApiError { status, .. } => self.status_codes.contains(status),
            LlmError::Network(_) | LlmError::Timeout(_) => true,
            _ => false,
        }
    }

    /// Run `op` until it succeeds, fails permanently or attempts run out
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, LlmError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.attempts && self.should_retry(&e) => {
                    let delay = self.delay(attempt);
                    warn!(
                        %label,
                        attempt,
                        max_attempts = self.attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying after transient error"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    debug!(%label, attempt, error = %e, "RetryPolicy::run: giving up");
                    return Err(e);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
