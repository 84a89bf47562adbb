//! The single assistant session.
//!
//! Owns everything the assistant remembers while it runs: the message log,
//! the memory store, the directory, the web sources of the last grounded
//! answer, and the held camera frame. Every mutation that a renderer cares
//! about is published on the event bus.

use chrono::{DateTime, Utc};
use nova_types::chat::{CapturedImage, ChatMessage, WebSource};
use nova_types::event::SessionEvent;
use uuid::Uuid;

use crate::action::dispatcher::ActionState;
use crate::directory::Directory;
use crate::event::bus::EventBus;
use crate::memory::store::MemoryStore;

/// First message of every session.
pub const GREETING: &str = "Initializing Nova Assistant... Stand by.";

pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    messages: Vec<ChatMessage>,
    memory: MemoryStore,
    directory: Directory,
    web_sources: Vec<WebSource>,
    photo: Option<CapturedImage>,
    /// Turns that reached the chat service (recall short-circuits excluded).
    turn_count: u32,
    events: EventBus,
}

impl Session {
    pub fn new(memory: MemoryStore, events: EventBus) -> Self {
        Self {
            id: Uuid::now_v7(),
            started_at: Utc::now(),
            ended_at: None,
            messages: Vec::new(),
            memory,
            directory: Directory::new(),
            web_sources: Vec::new(),
            photo: None,
            turn_count: 0,
            events,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut Directory {
        &mut self.directory
    }

    pub fn web_sources(&self) -> &[WebSource] {
        &self.web_sources
    }

    pub fn photo(&self) -> Option<&CapturedImage> {
        self.photo.as_ref()
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Append to the log. The log is never edited or truncated.
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message.clone());
        self.events.publish(SessionEvent::MessageAppended { message });
    }

    /// Replace the web sources wholesale.
    pub fn replace_web_sources(&mut self, sources: Vec<WebSource>) {
        self.web_sources = sources.clone();
        self.events.publish(SessionEvent::WebSourcesUpdated { sources });
    }

    pub fn increment_turn(&mut self) {
        self.turn_count += 1;
    }

    pub fn mark_terminated(&mut self) {
        self.ended_at = Some(Utc::now());
    }

    /// Borrow the state an action may mutate.
    pub fn action_state(&mut self) -> ActionState<'_> {
        ActionState {
            memory: &mut self.memory,
            directory: &mut self.directory,
            photo: &mut self.photo,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("messages", &self.messages.len())
            .field("memory_entries", &self.memory.len())
            .field("contacts", &self.directory.contacts().len())
            .field("reminders", &self.directory.reminders().len())
            .field("turn_count", &self.turn_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nova_types::chat::MessageRole;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new(MemoryStore::new(), EventBus::default());
        assert!(session.messages().is_empty());
        assert!(session.web_sources().is_empty());
        assert!(session.photo().is_none());
        assert!(session.ended_at().is_none());
        assert_eq!(session.turn_count(), 0);
    }

    #[test]
    fn test_append_publishes() {
        let events = EventBus::new(16);
        let mut rx = events.subscribe();
        let mut session = Session::new(MemoryStore::new(), events);

        session.append(ChatMessage::system(GREETING));

        assert_eq!(session.messages()[0].role, MessageRole::System);
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::MessageAppended {
                message: ChatMessage::system(GREETING)
            }
        );
    }

    #[test]
    fn test_replace_web_sources() {
        let mut session = Session::new(MemoryStore::new(), EventBus::default());
        session.replace_web_sources(vec![WebSource {
            uri: "https://example.com".to_string(),
            title: "Example".to_string(),
        }]);
        assert_eq!(session.web_sources().len(), 1);
        session.replace_web_sources(Vec::new());
        assert!(session.web_sources().is_empty());
    }

    #[test]
    fn test_action_state_reaches_memory() {
        let mut session = Session::new(MemoryStore::new(), EventBus::default());
        session.action_state().memory.remember("dog", "Rex");
        assert_eq!(session.memory().recall("DOG"), Some(("dog", "Rex")));
    }

    #[test]
    fn test_mark_terminated() {
        let mut session = Session::new(MemoryStore::new(), EventBus::default());
        session.increment_turn();
        session.mark_terminated();
        assert!(session.ended_at().is_some());
        assert_eq!(session.turn_count(), 1);
    }
}
