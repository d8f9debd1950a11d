use std::sync::Arc;
use std::time::Duration;
use log::{debug, trace, error, info, warn};

use crate::error::Error;
use crate::providers::Transport;
use crate::request::{
  UpstreamCompletionRequest
, UpstreamCompletionResponse
, UpstreamResponse
};
use crate::retry::RetryPolicy;

/// Transient outcome of a failed attempt, kept for final reporting
#[derive(Debug, Clone, PartialEq, Eq)]
enum AttemptFailure
{   Status
    {   status: u16
      , body: String
    }
  , Transport(String)
  , Timeout
}

impl AttemptFailure
{   fn into_error(self) -> Error
    {   match self
        {   AttemptFailure::Timeout => Error::Timeout
          , AttemptFailure::Status { status, body } => {
              Error::RetriesExhausted
              {   status: Some(status)
                , details: body
              }
            }
          , AttemptFailure::Transport(details) => {
              Error::RetriesExhausted
              {   status: None
                , details
              }
            }
        }
    }
}

/// Calls the upstream with a per-attempt deadline and
/// sequential retries
#[derive(Clone)]
pub struct CompletionClient
{   transport: Arc<dyn Transport>
  , policy: RetryPolicy
  , timeout: Duration
}

impl CompletionClient
{   pub fn new(
      transport: Arc<dyn Transport>
    , policy: RetryPolicy
    , timeout: Duration
    ) -> Self
    {   debug!(
          "Creating CompletionClient: {} attempts, {:?} timeout",
          policy.attempts(),
          timeout
        );
        CompletionClient
        {   transport
          , policy
          , timeout
        }
    }

    pub fn from_config(
      transport: Arc<dyn Transport>
    , config: &crate::config::ProxyConfig
    ) -> Self
    {   CompletionClient::new(
          transport,
          RetryPolicy::from_config(config),
          config.timeout()
        )
    }

    /// Send `message` as a single user turn and return the reply text
    pub async fn complete(
      &self
    , message: &str
    , api_key: &str
    ) -> Result<String, Error>
    {   let request = UpstreamCompletionRequest::single_turn(message);
        let attempts = self.policy.attempts();
        let mut last_failure = AttemptFailure::Transport(
          "no attempt was made".to_string()
        );

        for attempt in 1..=attempts
        {   info!("Upstream attempt {}/{}", attempt, attempts);

            match self.attempt(&request, api_key).await
            {   Ok(response) if response.is_success() => {
                  debug!("Upstream succeeded on attempt {}", attempt);
                  return parse_completion(&response.body);
                }
              , Ok(response)
                  if RetryPolicy::is_retryable_status(response.status) =>
                {   warn!(
                      "Upstream returned retryable {} on attempt {}: {}",
                      response.status, attempt, response.body
                    );
                    last_failure = AttemptFailure::Status
                    {   status: response.status
                      , body: response.body
                    };
                }
              , Ok(response) => {
                  error!(
                    "Upstream returned {}: {}",
                    response.status, response.body
                  );
                  return Err(Error::UpstreamStatus
                  {   status: response.status
                    , body: response.body
                  });
                }
              , Err(failure) => {
                  warn!(
                    "Upstream attempt {} failed: {:?}",
                    attempt, failure
                  );
                  last_failure = failure;
                }
            }

            if attempt < attempts
            {   let delay = self.policy.backoff_for_attempt(attempt);
                debug!("Backing off {:?} before next attempt", delay);
                tokio::time::sleep(delay).await;
            }
        }

        error!("Upstream attempts exhausted: {:?}", last_failure);
        Err(last_failure.into_error())
    }

    async fn attempt(
      &self
    , request: &UpstreamCompletionRequest
    , api_key: &str
    ) -> Result<UpstreamResponse, AttemptFailure>
    {   match tokio::time::timeout(
          self.timeout,
          self.transport.send(request, api_key)
        ).await
        {   Ok(Ok(response)) => Ok(response)
          , Ok(Err(e)) => Err(AttemptFailure::Transport(e.to_string()))
          , Err(_) => Err(AttemptFailure::Timeout)
        }
    }
}

/// Pull `choices[0].message.content` out of a success body
pub fn parse_completion(body: &str) -> Result<String, Error>
{   let completion: UpstreamCompletionResponse
      = serde_json::from_str(body).map_err(|e| {
        error!("Unparseable upstream body ({}): {}", e, body);
        Error::InvalidResponse(e.to_string())
      })?;

    trace!("Parsed upstream response: {:?}", completion);

    completion.choices.into_iter()
      .next()
      .map(|c| c.message.content)
      .ok_or_else(|| {
        error!("No choices in upstream response: {}", body);
        Error::InvalidResponse("empty choices".to_string())
      })
}
