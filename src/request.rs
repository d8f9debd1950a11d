//! Inbound and upstream request/response types

use serde::{Deserialize, Serialize};

/// Model every completion is requested from
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

// ===== Inbound =====

/// Body of `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest
{   pub message: String
}

impl ChatRequest
{   /// Parse a raw body, rejecting anything without a non-empty
    /// string `message`
    pub fn from_body(body: &[u8])
      -> Result<Self, crate::error::Error>
    {   let value: serde_json::Value = serde_json::from_slice(body)
          .map_err(|e| {
            log::debug!("Rejecting chat body: {}", e);
            crate::error::Error::MissingMessage
          })?;

        // only an object carries `message`; arrays and scalars do not
        let message = value
          .as_object()
          .and_then(|fields| fields.get("message"))
          .and_then(|m| m.as_str())
          .filter(|m| !m.is_empty())
          .ok_or_else(|| {
            log::debug!("Chat body has no usable message: {}", value);
            crate::error::Error::MissingMessage
          })?;

        Ok(ChatRequest
        {   message: message.to_string()
        })
    }
}

/// Successful reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply
{   pub message: String
}

/// Error reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatError
{   pub error: String
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>
}

impl ChatError
{   pub fn new(error: &str) -> Self
    {   ChatError
        {   error: error.to_string()
          , details: None
        }
    }

    pub fn with_details(error: &str, details: String) -> Self
    {   ChatError
        {   error: error.to_string()
          , details: Some(details)
        }
    }
}

// ===== Upstream =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamCompletionRequest
{   pub model: String
  , pub messages: Vec<ChatMessage>
}

impl UpstreamCompletionRequest
{   /// Single-turn request carrying the user text untouched
    pub fn single_turn(content: &str) -> Self
    {   UpstreamCompletionRequest
        {   model: DEFAULT_MODEL.to_string()
          , messages: vec![
              ChatMessage
              {   role: "user".to_string()
                , content: content.to_string()
              }
            ]
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamCompletionResponse
{   pub choices: Vec<Choice>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice
{   pub message: ChoiceMessage
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage
{   pub content: String
}

/// Raw outcome of one upstream call, body fully read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse
{   pub status: u16
  , pub body: String
}

impl UpstreamResponse
{   pub fn is_success(&self) -> bool
    {   (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::error::Error;

    #[test]
    fn accepts_plain_message()
    {   let request = ChatRequest::from_body(
          br#"{"message":"hello there"}"#
        ).unwrap();
        assert_eq!(request.message, "hello there");
    }

    #[test]
    fn whitespace_message_is_kept()
    {   let request = ChatRequest::from_body(br#"{"message":"  "}"#)
          .unwrap();
        assert_eq!(request.message, "  ");
    }

    #[test]
    fn rejects_unusable_bodies()
    {   let bodies: [&[u8]; 9] = [
          br#"{"message":""}"#
        , br#"{}"#
        , br#"{"message":null}"#
        , br#"{"message":42}"#
        , b"not json"
        , b""
        , br#"["hello"]"#
        , br#""hello""#
        , br#"{"message":["hello"]}"#
        ];
        for body in bodies
        {   assert_eq!(
              ChatRequest::from_body(body).unwrap_err(),
              Error::MissingMessage
            );
        }
    }

    #[test]
    fn upstream_request_shape()
    {   let request = UpstreamCompletionRequest::single_turn("Hi <b>");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
          json,
          serde_json::json!({
            "model": "gpt-3.5-turbo",
            "messages": [{ "role": "user", "content": "Hi <b>" }]
          })
        );
    }

    #[test]
    fn error_body_omits_empty_details()
    {   let json = serde_json::to_value(ChatError::new("x")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "x" }));
    }
}
