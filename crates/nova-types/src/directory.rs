//! Contact and reminder types for Nova.
//!
//! Both live only in memory for the lifetime of a session. Identifiers are
//! monotonic integers derived from the creation time in milliseconds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved contact. Names are unique within the directory, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub phone: String,
}

/// A pending reminder, removed from the directory the moment it fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub text: String,
    pub due_time: DateTime<Utc>,
}

impl Reminder {
    /// Whether the reminder should fire at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.due_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_reminder_is_due_boundary() {
        let now = Utc::now();
        let reminder = Reminder {
            id: 1,
            text: "stand up".to_string(),
            due_time: now,
        };
        assert!(reminder.is_due(now));
        assert!(!reminder.is_due(now - Duration::milliseconds(1)));
    }

    #[test]
    fn test_contact_serialize() {
        let contact = Contact {
            id: 7,
            name: "Alice".to_string(),
            phone: "555-0100".to_string(),
        };
        let json = serde_json::to_string(&contact).unwrap();
        assert!(json.contains("\"name\":\"Alice\""));
    }
}
