//! Conversation types for Nova.
//!
//! These types model a single assistant session as seen by the rest of the
//! system: the append-only message log, the derived assistant status, the
//! web sources attached to a grounded answer, and a captured camera frame.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Author of a message in the session log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::System => write!(f, "system"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            "system" => Ok(MessageRole::System),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single entry in the session's message log.
///
/// The log is append-only and ordered by arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            text: text.into(),
        }
    }
}

/// What the assistant is doing right now, for display purposes.
///
/// Never stored: always recomputed from the session's loading/active flags
/// and the speech channel's speaking flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantStatus {
    Listening,
    Thinking,
    Speaking,
    Idle,
}

impl AssistantStatus {
    /// Derive the status from the raw session flags.
    ///
    /// A terminated session is idle; otherwise an outstanding remote call
    /// takes precedence over speech.
    pub fn derive(is_active: bool, is_loading: bool, is_speaking: bool) -> Self {
        if !is_active {
            AssistantStatus::Idle
        } else if is_loading {
            AssistantStatus::Thinking
        } else if is_speaking {
            AssistantStatus::Speaking
        } else {
            AssistantStatus::Listening
        }
    }
}

impl fmt::Display for AssistantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssistantStatus::Listening => write!(f, "listening"),
            AssistantStatus::Thinking => write!(f, "thinking"),
            AssistantStatus::Speaking => write!(f, "speaking"),
            AssistantStatus::Idle => write!(f, "idle"),
        }
    }
}

/// A web page cited by a grounded (search-augmented) answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    pub uri: String,
    pub title: String,
}

/// A still frame taken from the visual capture device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub captured_at: DateTime<Utc>,
}

impl CapturedImage {
    /// Wrap raw JPEG bytes taken now.
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: "image/jpeg".to_string(),
            captured_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::User, MessageRole::Assistant, MessageRole::System] {
            let parsed: MessageRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_message_role_serde() {
        let json = serde_json::to_string(&MessageRole::System).unwrap();
        assert_eq!(json, "\"system\"");
    }

    #[test]
    fn test_status_precedence() {
        assert_eq!(AssistantStatus::derive(true, false, false), AssistantStatus::Listening);
        assert_eq!(AssistantStatus::derive(true, true, true), AssistantStatus::Thinking);
        assert_eq!(AssistantStatus::derive(true, false, true), AssistantStatus::Speaking);
        assert_eq!(AssistantStatus::derive(false, true, true), AssistantStatus::Idle);
    }

    #[test]
    fn test_message_constructors() {
        let msg = ChatMessage::system("REMINDER: stretch");
        assert_eq!(msg.role, MessageRole::System);
        assert_eq!(msg.text, "REMINDER: stretch");
    }
}
