//! Outbound transports to the upstream completion API

use async_trait::async_trait;

pub mod openai;

// Re-export for convenience
pub use openai::OpenAiTransport;

/// One outbound call. Deadlines are applied by the caller, which
/// cancels by dropping the returned future.
#[async_trait]
pub trait Transport: Send + Sync
{   async fn send(
      &self
    , request: &crate::request::UpstreamCompletionRequest
    , api_key: &str
    ) -> Result<crate::request::UpstreamResponse, crate::error::Error>;
}
