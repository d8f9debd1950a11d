use async_trait::async_trait;
use log::{debug, trace, error};

use crate::request::{UpstreamCompletionRequest, UpstreamResponse};

// ===== OpenAI Transport =====

/// reqwest-backed transport for the OpenAI chat completions API
#[derive(Debug, Clone)]
pub struct OpenAiTransport
{   api_base: String
  , http_client: reqwest::Client
}

impl OpenAiTransport
{   pub fn new(api_base: &str) -> Self
    {   debug!("Creating OpenAiTransport for {}", api_base);
        OpenAiTransport
        {   api_base: api_base.trim_end_matches('/').to_string()
          , http_client: reqwest::Client::new()
        }
    }

    pub fn from_config(config: &crate::config::ProxyConfig) -> Self
    {   OpenAiTransport::new(&config.api_base)
    }

    pub fn completions_url(&self) -> String
    {   format!("{}/chat/completions", self.api_base)
    }
}

#[async_trait]
impl crate::providers::Transport for OpenAiTransport
{   async fn send(
      &self
    , request: &UpstreamCompletionRequest
    , api_key: &str
    ) -> Result<UpstreamResponse, crate::error::Error>
    {   trace!("OpenAI request: {:?}", request);

        let response = self.http_client
          .post(self.completions_url())
          .header("Authorization", format!("Bearer {}", api_key))
          .header("Content-Type", "application/json")
          .json(request)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            crate::error::Error::HttpError(e.to_string())
          })?;

        let status = response.status().as_u16();
        trace!("OpenAI response status: {}", status);

        let body = response.text().await.map_err(|e| {
          error!("Failed to read OpenAI body: {}", e);
          crate::error::Error::HttpError(e.to_string())
        })?;

        Ok(UpstreamResponse
        {   status
          , body
        })
    }
}
