//! Fixed replies for trigger phrases, answered without the upstream

use log::debug;

/// One row of the canned-reply table
#[derive(Debug, Clone, Copy)]
pub struct CannedReply
{   /// Short label used in logs
    pub name: &'static str
  , /// Substrings that trigger this reply
    pub phrases: &'static [&'static str]
  , /// Whether phrases must match with exact case
    pub case_sensitive: bool
  , /// Text returned to the caller
    pub reply: &'static str
}

pub const IDENTITY_REPLY: &str
  = "I am ChatProxy Bot, an AI assistant here to answer your questions.";

pub const DEVELOPER_REPLY: &str
  = "I was developed by the ChatProxy team.";

pub const IDENTITY_PHRASES: &[&str] = &[
  "who are you"
, "what are you"
, "what is your name"
, "what's your name"
, "introduce yourself"
, "qui es-tu"
, "comment tu t'appelles"
, "quién eres"
, "cómo te llamas"
, "wer bist du"
, "wie heißt du"
, "你是谁"
, "你叫什么"
, "あなたは誰"
, "너는 누구"
];

pub const DEVELOPER_PHRASES: &[&str] = &[
  "who made you"
, "who created you"
, "who developed you"
, "who built you"
, "your developer"
, "your creator"
, "qui t'a créé"
, "quién te creó"
, "wer hat dich entwickelt"
, "谁开发了你"
, "谁创造了你"
, "誰があなたを作った"
];

/// Evaluated in order; identity wins when both match
pub const CANNED_REPLIES: &[CannedReply] = &[
  CannedReply
  {   name: "identity"
    , phrases: IDENTITY_PHRASES
    , case_sensitive: false
    , reply: IDENTITY_REPLY
  }
, CannedReply
  {   name: "developer"
    , phrases: DEVELOPER_PHRASES
    , case_sensitive: true
    , reply: DEVELOPER_REPLY
  }
];

/// Match against the built-in table
pub fn match_canned(message: &str) -> Option<&'static str>
{   match_in(CANNED_REPLIES, message)
}

/// First table row with a phrase contained in `message`
pub fn match_in(
  table: &[CannedReply]
, message: &str
) -> Option<&'static str>
{   let lowered = message.to_lowercase();
    table.iter()
      .find(|entry| entry.matches(message, &lowered))
      .map(|entry| {
        debug!("Canned reply matched: {}", entry.name);
        entry.reply
      })
}

impl CannedReply
{   fn matches(&self, message: &str, lowered: &str) -> bool
    {   if self.case_sensitive
        {   self.phrases.iter().any(|p| message.contains(p))
        } else
        {   self.phrases
              .iter()
              .any(|p| lowered.contains(&p.to_lowercase()))
        }
    }
}
