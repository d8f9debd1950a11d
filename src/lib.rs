pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod retry;
pub mod canned;
pub mod client;
pub mod handler;

use std::any::Any;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use log::error;
use tower_http::catch_panic::CatchPanicLayer;

/*

chatproxy: a single `POST /api/chat` endpoint in front of the
OpenAI chat completions API.

request ─► key check ─► body check ─► canned table ─► upstream
                                           │             │
                                           ▼             ▼
                                      fixed reply   timeout + retry
                                                    (429/503 and
                                                     transport errors)

*/

pub use client::CompletionClient;
pub use config::ProxyConfig;
pub use error::Error;
pub use handler::ChatProxyHandler;
pub use providers::{OpenAiTransport, Transport};
pub use request::{ChatError, ChatReply, ChatRequest};
pub use retry::RetryPolicy;

pub const CHAT_ROUTE: &str = "/api/chat";

/// Build the HTTP router around a handler
pub fn router(handler: ChatProxyHandler) -> Router
{   Router::new()
      .route(CHAT_ROUTE, post(handler::chat_handler))
      .layer(CatchPanicLayer::custom(panic_response))
      .with_state(Arc::new(handler))
}

/// Build the handler for a config, talking to the real upstream
pub fn build_handler(config: ProxyConfig) -> ChatProxyHandler
{   let transport = Arc::new(OpenAiTransport::from_config(&config));
    ChatProxyHandler::new(config, transport)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response
{   let detail = if let Some(s) = panic.downcast_ref::<String>()
    {   s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>()
    {   s.to_string()
    } else
    {   "unknown panic".to_string()
    };
    error!("Chat handler panicked: {}", detail);
    Error::Other(detail).into_response()
}
