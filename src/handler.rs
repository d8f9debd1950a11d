//! `POST /api/chat` request handling

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{debug, info, warn, error};

use crate::canned::CannedReply;
use crate::client::CompletionClient;
use crate::config::ProxyConfig;
use crate::error::Error;
use crate::providers::Transport;
use crate::request::{ChatReply, ChatRequest};

/// Accepts one chat message and answers it from the canned table
/// or the upstream completion API
#[derive(Clone)]
pub struct ChatProxyHandler
{   config: Arc<ProxyConfig>
  , canned: &'static [CannedReply]
  , client: CompletionClient
}

impl ChatProxyHandler
{   pub fn new(
      config: ProxyConfig
    , transport: Arc<dyn Transport>
    ) -> Self
    {   debug!("Creating ChatProxyHandler");
        let client = CompletionClient::from_config(transport, &config);
        ChatProxyHandler
        {   config: Arc::new(config)
          , canned: crate::canned::CANNED_REPLIES
          , client
        }
    }

    /// Replace the canned-reply table
    pub fn with_canned_replies(
      mut self
    , canned: &'static [CannedReply]
    ) -> Self
    {   self.canned = canned;
        self
    }

    /// Turn a raw request body into the HTTP response
    pub async fn handle(&self, body: &[u8]) -> Response
    {   match self.reply(body).await
        {   Ok(message) => {
              Json(ChatReply { message }).into_response()
            }
          , Err(e) if e.is_client_error() => {
              warn!("Rejected chat request: {}", e);
              e.into_response()
            }
          , Err(e) => {
              error!("Chat request failed: {}", e);
              e.into_response()
            }
        }
    }

    /// Reply text for a raw body; the key check precedes parsing
    pub async fn reply(&self, body: &[u8]) -> Result<String, Error>
    {   info!("Chat request received ({} bytes)", body.len());

        let api_key = self.config.api_key.as_deref()
          .ok_or_else(|| {
            error!("OPENAI_API_KEY is not configured");
            Error::MissingApiKey
          })?;

        let request = ChatRequest::from_body(body)?;
        debug!("Chat message: {:?}", request.message);

        if let Some(reply) = crate::canned::match_in(
          self.canned,
          &request.message
        )
        {   info!("Answering with canned reply");
            return Ok(reply.to_string());
        }

        let message = self.client
          .complete(&request.message, api_key)
          .await?;
        info!("Upstream reply received ({} chars)", message.len());
        Ok(message)
    }
}

/// axum route for `POST /api/chat`
pub async fn chat_handler(
  State(handler): State<Arc<ChatProxyHandler>>
, body: Bytes
) -> Response
{   handler.handle(&body).await
}
