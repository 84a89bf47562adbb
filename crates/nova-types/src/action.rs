//! Action tag types for Nova.
//!
//! A model reply may embed one `[ACTION:<name>:<params>]` tag. These types
//! carry the result of parsing it: the reply text the user should hear, the
//! action name, and its `key=value` parameters in the order they appeared.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// The actions the dispatcher knows how to execute.
///
/// Parsing never rejects an unknown name; it simply has no `ActionKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    CapturePhoto,
    ClearPhoto,
    SavePhoto,
    SetReminder,
    AddContact,
    DeleteContact,
    ViewContacts,
    Remember,
    Forget,
    ViewMemory,
    CallContact,
    SendWhatsapp,
    OpenApp,
    CloseApp,
}

impl ActionKind {
    pub const ALL: [ActionKind; 14] = [
        ActionKind::CapturePhoto,
        ActionKind::ClearPhoto,
        ActionKind::SavePhoto,
        ActionKind::SetReminder,
        ActionKind::AddContact,
        ActionKind::DeleteContact,
        ActionKind::ViewContacts,
        ActionKind::Remember,
        ActionKind::Forget,
        ActionKind::ViewMemory,
        ActionKind::CallContact,
        ActionKind::SendWhatsapp,
        ActionKind::OpenApp,
        ActionKind::CloseApp,
    ];

    /// The wire name used inside the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::CapturePhoto => "capture_photo",
            ActionKind::ClearPhoto => "clear_photo",
            ActionKind::SavePhoto => "save_photo",
            ActionKind::SetReminder => "set_reminder",
            ActionKind::AddContact => "add_contact",
            ActionKind::DeleteContact => "delete_contact",
            ActionKind::ViewContacts => "view_contacts",
            ActionKind::Remember => "remember",
            ActionKind::Forget => "forget",
            ActionKind::ViewMemory => "view_memory",
            ActionKind::CallContact => "call_contact",
            ActionKind::SendWhatsapp => "send_whatsapp",
            ActionKind::OpenApp => "open_app",
            ActionKind::CloseApp => "close_app",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    /// Exact, case-sensitive match on the wire name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown action: '{s}'"))
    }
}

/// Ordered `key=value` parameters of an action tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParams {
    pairs: Vec<(String, String)>,
}

impl ActionParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Look up a parameter. When a key repeats, the last occurrence wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ActionParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = ActionParams::new();
        for (k, v) in iter {
            params.push(k, v);
        }
        params
    }
}

/// One action extracted from a model reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAction {
    /// Text before the first colon inside the tag.
    pub name: String,
    /// Everything after the first colon, colons included.
    pub raw_params: String,
    pub params: ActionParams,
}

impl ParsedAction {
    /// The known action this tag names, if any.
    pub fn kind(&self) -> Option<ActionKind> {
        self.name.parse().ok()
    }
}

/// A model reply split into what is spoken and what is executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReply {
    pub visible_text: String,
    pub action: Option<ParsedAction>,
}
