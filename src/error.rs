use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::request::ChatError;

pub const MISSING_API_KEY: &str = "OpenAI API key is not configured";
pub const MISSING_MESSAGE: &str = "Missing message";
pub const INVALID_RESPONSE: &str = "Invalid response from OpenAI API";
pub const REQUEST_TIMED_OUT: &str = "OpenAI API request timed out";
pub const REQUEST_FAILED: &str = "OpenAI API request failed";
pub const RETRIES_EXHAUSTED: &str
  = "OpenAI API request failed after retries";
pub const UNKNOWN_FAILURE: &str = "Failed to get response from AI";

/// Custom error type for chatproxy operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Upstream API key is not configured
    MissingApiKey
  , /// Inbound body has no usable `message`
    MissingMessage
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Transport-level failure talking to the upstream
    HttpError(String)
  , /// Upstream answered with a non-retryable status
    UpstreamStatus
    {   status: u16
      , body: String
    }
  , /// Every attempt failed with a transient condition
    RetriesExhausted
    {   status: Option<u16>
      , details: String
    }
  , /// Final attempt exceeded its deadline
    Timeout
  , /// Upstream succeeded but the payload was unusable
    InvalidResponse(String)
  , /// Generic error
    Other(String)
}

impl Error
{   /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode
    {   match self
        {   Error::MissingMessage => StatusCode::BAD_REQUEST
          , Error::Timeout => StatusCode::GATEWAY_TIMEOUT
          , Error::UpstreamStatus { status, .. } => {
              StatusCode::from_u16(*status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
          , Error::RetriesExhausted { status: Some(status), .. } => {
              StatusCode::from_u16(*status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
          , _ => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Caused by the caller rather than this server or the upstream
    pub fn is_client_error(&self) -> bool
    {   matches!(self, Error::MissingMessage)
    }

    /// Caller-facing body. Raw upstream text is only relayed for
    /// status failures, never for an unusable success payload.
    pub fn to_chat_error(&self) -> ChatError
    {   match self
        {   Error::MissingApiKey => ChatError::new(MISSING_API_KEY)
          , Error::MissingMessage => ChatError::new(MISSING_MESSAGE)
          , Error::InvalidResponse(_) => {
              ChatError::new(INVALID_RESPONSE)
            }
          , Error::Timeout => ChatError::new(REQUEST_TIMED_OUT)
          , Error::UpstreamStatus { body, .. } => {
              ChatError::with_details(REQUEST_FAILED, body.clone())
            }
          , Error::RetriesExhausted { details, .. } => {
              ChatError::with_details(
                RETRIES_EXHAUSTED,
                details.clone()
              )
            }
          , Error::InvalidConfiguration(_)
          | Error::HttpError(_)
          | Error::Other(_) => ChatError::new(UNKNOWN_FAILURE)
        }
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingApiKey => {
              write!(f, "{}", MISSING_API_KEY)
            }
          , Error::MissingMessage => {
              write!(f, "{}", MISSING_MESSAGE)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::UpstreamStatus { status, body } => {
              write!(f, "Upstream returned {}: {}", status, body)
            }
          , Error::RetriesExhausted { status, details } => {
              match status
              {   Some(s) => write!(f,
                    "Retries exhausted (last status {}): {}",
                    s, details
                  )
                , None => write!(f,
                    "Retries exhausted: {}",
                    details
                  )
              }
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::InvalidResponse(msg) => {
              write!(f, "Invalid upstream response: {}", msg)
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error
{   fn into_response(self) -> Response
    {   (self.status_code(), Json(self.to_chat_error()))
          .into_response()
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn upstream_status_is_forwarded_verbatim()
    {   let err = Error::UpstreamStatus
        {   status: 401
          , body: "{\"error\":\"bad key\"}".to_string()
        };
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        let body = err.to_chat_error();
        assert_eq!(body.error, REQUEST_FAILED);
        assert_eq!(
          body.details.as_deref(),
          Some("{\"error\":\"bad key\"}")
        );
    }

    #[test]
    fn retries_exhausted_without_status_is_500()
    {   let err = Error::RetriesExhausted
        {   status: None
          , details: "connection refused".to_string()
        };
        assert_eq!(
          err.status_code(),
          StatusCode::INTERNAL_SERVER_ERROR
        );

        let err = Error::RetriesExhausted
        {   status: Some(429)
          , details: "slow down".to_string()
        };
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.to_chat_error().error, RETRIES_EXHAUSTED);
    }

    #[test]
    fn invalid_response_hides_upstream_text()
    {   let err = Error::InvalidResponse(
          "{\"secret\":\"internal\"}".to_string()
        );
        let body = err.to_chat_error();
        assert_eq!(body.error, INVALID_RESPONSE);
        assert!(body.details.is_none());
    }

    #[test]
    fn unexpected_errors_use_catch_all_body()
    {   for err in [
          Error::Other("boom".into())
        , Error::HttpError("reset".into())
        ]
        {   assert_eq!(
              err.status_code(),
              StatusCode::INTERNAL_SERVER_ERROR
            );
            assert_eq!(err.to_chat_error().error, UNKNOWN_FAILURE);
        }
    }

    #[test]
    fn only_bad_input_is_a_client_error()
    {   assert!(Error::MissingMessage.is_client_error());
        for err in [
          Error::MissingApiKey
        , Error::Timeout
        , Error::InvalidResponse("x".into())
        , Error::UpstreamStatus { status: 400, body: "x".into() }
        ]
        {   assert!(!err.is_client_error());
        }
    }

    #[test]
    fn timeout_maps_to_gateway_timeout()
    {   assert_eq!(
          Error::Timeout.status_code(),
          StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
          Error::Timeout.to_chat_error().error,
          REQUEST_TIMED_OUT
        );
    }
}
