//! Retry policy for upstream calls

use std::time::Duration;
use log::debug;

/// Upstream statuses worth another attempt
pub const RETRYABLE_STATUSES: [u16; 2] = [429, 503];

/// Retry policy for failed requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy
{   pub max_retries: usize
  , pub base_delay: Duration
}

impl RetryPolicy
{   /// Create a new retry policy
    pub fn new(
      max_retries: usize
    , base_delay_ms: u64
    ) -> Self
    {   RetryPolicy
        {   max_retries
          , base_delay: Duration::from_millis(base_delay_ms)
        }
    }

    pub fn from_config(config: &crate::config::ProxyConfig) -> Self
    {   RetryPolicy::new(
          config.max_retries,
          config.retry_base_delay_ms
        )
    }

    /// Total attempts, first one included
    pub fn attempts(&self) -> usize
    {   self.max_retries + 1
    }

    /// Delay after the 1-based `attempt` fails, before the next one
    pub fn backoff_for_attempt(
      &self
    , attempt: usize
    ) -> Duration
    {   debug!("Calculating backoff for attempt {}", attempt);
        self.base_delay * attempt as u32
    }

    pub fn is_retryable_status(status: u16) -> bool
    {   RETRYABLE_STATUSES.contains(&status)
    }
}

impl Default for RetryPolicy
{   fn default() -> Self
    {   RetryPolicy::new(
          crate::config::DEFAULT_MAX_RETRIES,
          crate::config::DEFAULT_RETRY_DELAY_MS
        )
    }
}
