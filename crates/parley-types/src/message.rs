//! Transcript messages and their delivery bookkeeping.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::interview::InterviewId;
use crate::response::ResponseId;

/// Author of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    Human,
    Agent,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::Human => write!(f, "human"),
            MessageRole::Agent => write!(f, "agent"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(MessageRole::Human),
            "agent" => Ok(MessageRole::Agent),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message. Its position in the transcript is its sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Human,
            content: content.into(),
        }
    }

    pub fn agent(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Agent,
            content: content.into(),
        }
    }
}

/// Where a transcript entry stands relative to the remote service.
///
/// Human entries start `Provisional` and become `Confirmed` or `Failed` once
/// the round trip settles. Agent replies arrive `Confirmed`; the apology
/// appended after a failed round trip is `Fallback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    Provisional,
    Confirmed,
    Failed,
    Fallback,
}

/// A message plus its delivery state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub message: Message,
    pub delivery: DeliveryState,
}

impl TranscriptEntry {
    pub fn confirmed(message: Message) -> Self {
        Self {
            message,
            delivery: DeliveryState::Confirmed,
        }
    }

    pub fn provisional(message: Message) -> Self {
        Self {
            message,
            delivery: DeliveryState::Provisional,
        }
    }

    pub fn fallback(content: impl Into<String>) -> Self {
        Self {
            message: Message::agent(content),
            delivery: DeliveryState::Fallback,
        }
    }
}

/// Addressing for transcript reads and message posts.
///
/// Planning conversations are keyed by the interview, candidate
/// conversations by the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionTarget {
    Planning(InterviewId),
    Response(ResponseId),
}

impl fmt::Display for SessionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionTarget::Planning(id) => write!(f, "planning:{id}"),
            SessionTarget::Response(id) => write!(f, "response:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_serde() {
        let msg = Message::human("hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"human","content":"hello"}"#);
        let role: MessageRole = serde_json::from_str("\"agent\"").unwrap();
        assert_eq!(role, MessageRole::Agent);
    }

    #[test]
    fn test_fallback_entry_is_agent_authored() {
        let entry = TranscriptEntry::fallback("sorry");
        assert_eq!(entry.message.role, MessageRole::Agent);
        assert_eq!(entry.delivery, DeliveryState::Fallback);
    }

    #[test]
    fn test_session_target_display() {
        let id = InterviewId::new();
        assert_eq!(SessionTarget::Planning(id).to_string(), format!("planning:{id}"));
    }
}
