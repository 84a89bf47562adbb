//! Session events for Nova.
//!
//! Published on the session's event bus so a renderer can follow the
//! conversation without reading session state directly.

use serde::{Deserialize, Serialize};

use crate::chat::{AssistantStatus, ChatMessage, WebSource};
use crate::directory::{Contact, Reminder};

/// Something observable happened in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A message was appended to the log.
    MessageAppended { message: ChatMessage },

    /// The derived assistant status changed.
    StatusChanged { status: AssistantStatus },

    /// The `view_contacts` action asked the display to show the directory.
    ContactsShown { contacts: Vec<Contact> },

    /// A new turn replaced the web sources (possibly with an empty list).
    WebSourcesUpdated { sources: Vec<WebSource> },

    /// A still frame is now held; the live feed is frozen.
    PhotoCaptured,

    /// The held frame was discarded; the live feed resumes.
    PhotoCleared,

    /// A reminder reached its due time and was removed.
    ReminderFired { reminder: Reminder },

    /// The session ended on request. Terminal.
    SessionTerminated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serde_tag() {
        let event = SessionEvent::StatusChanged {
            status: AssistantStatus::Thinking,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"status_changed","status":"thinking"}"#);
    }

    #[test]
    fn test_unit_event_serde() {
        let json = serde_json::to_string(&SessionEvent::SessionTerminated).unwrap();
        assert_eq!(json, r#"{"type":"session_terminated"}"#);
    }
}
