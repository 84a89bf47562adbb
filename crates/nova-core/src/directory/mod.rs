//! In-session contacts and reminders.
//!
//! Nothing here is persisted. Contact names are unique ignoring case, and
//! reminders leave the directory exactly once, when they fire.

use chrono::{DateTime, Duration, Utc};
use nova_types::directory::{Contact, Reminder};
use nova_types::error::DirectoryError;

#[derive(Debug, Clone, Default)]
pub struct Directory {
    contacts: Vec<Contact>,
    reminders: Vec<Reminder>,
    last_id: i64,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Millisecond timestamp ids, bumped when two entries land in the same
    /// millisecond.
    fn next_id(&mut self, now: DateTime<Utc>) -> i64 {
        let id = now.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        id
    }

    // ------------------------------------------------------------------
    // Contacts
    // ------------------------------------------------------------------

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn find_contact(&self, name: &str) -> Option<&Contact> {
        let needle = name.to_lowercase();
        self.contacts
            .iter()
            .find(|c| c.name.to_lowercase() == needle)
    }

    pub fn add_contact(
        &mut self,
        name: &str,
        phone: &str,
        now: DateTime<Utc>,
    ) -> Result<Contact, DirectoryError> {
        if self.find_contact(name).is_some() {
            return Err(DirectoryError::ContactExists(name.to_string()));
        }
        let contact = Contact {
            id: self.next_id(now),
            name: name.to_string(),
            phone: phone.to_string(),
        };
        self.contacts.push(contact.clone());
        Ok(contact)
    }

    pub fn delete_contact(&mut self, name: &str) -> Result<Contact, DirectoryError> {
        let needle = name.to_lowercase();
        let idx = self
            .contacts
            .iter()
            .position(|c| c.name.to_lowercase() == needle)
            .ok_or_else(|| DirectoryError::ContactNotFound(name.to_string()))?;
        Ok(self.contacts.remove(idx))
    }

    // ------------------------------------------------------------------
    // Reminders
    // ------------------------------------------------------------------

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    /// Schedule a reminder `due_in_secs` from `now`. Must be positive and
    /// land on a representable date.
    pub fn add_reminder(
        &mut self,
        text: &str,
        due_in_secs: i64,
        now: DateTime<Utc>,
    ) -> Result<Reminder, DirectoryError> {
        if due_in_secs <= 0 {
            return Err(DirectoryError::ReminderNotInFuture);
        }
        let due_time = Duration::try_seconds(due_in_secs)
            .and_then(|delta| now.checked_add_signed(delta))
            .ok_or(DirectoryError::ReminderOutOfRange)?;
        let reminder = Reminder {
            id: self.next_id(now),
            text: text.to_string(),
            due_time,
        };
        self.reminders.push(reminder.clone());
        Ok(reminder)
    }

    /// Remove and return every reminder due at `now`, in insertion order.
    pub fn take_due_reminders(&mut self, now: DateTime<Utc>) -> Vec<Reminder> {
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.reminders)
            .into_iter()
            .partition(|r| r.is_due(now));
        self.reminders = pending;
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_contact_rejects_duplicate_ignoring_case() {
        let mut dir = Directory::new();
        let now = Utc::now();
        dir.add_contact("Alice", "555 0100", now).unwrap();

        let err = dir.add_contact("alice", "555 0199", now).unwrap_err();
        assert_eq!(err, DirectoryError::ContactExists("alice".to_string()));
        assert_eq!(dir.contacts().len(), 1);
    }

    #[test]
    fn test_ids_are_unique_within_one_millisecond() {
        let mut dir = Directory::new();
        let now = Utc::now();
        let a = dir.add_contact("Alice", "1", now).unwrap();
        let b = dir.add_contact("Bob", "2", now).unwrap();
        let r = dir.add_reminder("stretch", 10, now).unwrap();
        assert!(b.id > a.id);
        assert!(r.id > b.id);
    }

    #[test]
    fn test_delete_contact() {
        let mut dir = Directory::new();
        dir.add_contact("Alice", "1", Utc::now()).unwrap();

        let removed = dir.delete_contact("ALICE").unwrap();
        assert_eq!(removed.name, "Alice");
        assert_eq!(
            dir.delete_contact("Alice").unwrap_err(),
            DirectoryError::ContactNotFound("Alice".to_string())
        );
    }

    #[test]
    fn test_reminder_must_be_in_future() {
        let mut dir = Directory::new();
        let now = Utc::now();
        assert_eq!(
            dir.add_reminder("late", 0, now).unwrap_err(),
            DirectoryError::ReminderNotInFuture
        );
        assert_eq!(
            dir.add_reminder("late", -5, now).unwrap_err(),
            DirectoryError::ReminderNotInFuture
        );
        assert!(dir.reminders().is_empty());
    }

    #[test]
    fn test_reminder_past_max_date_is_rejected() {
        let mut dir = Directory::new();
        let now = Utc::now();
        for secs in [9_000_000_000_000, 99_999_999_999_999_999, i64::MAX] {
            assert_eq!(
                dir.add_reminder("far", secs, now).unwrap_err(),
                DirectoryError::ReminderOutOfRange,
                "{secs}"
            );
        }
        assert!(dir.reminders().is_empty());
    }

    #[test]
    fn test_take_due_reminders_in_insertion_order() {
        let mut dir = Directory::new();
        let now = Utc::now();
        dir.add_reminder("second", 5, now).unwrap();
        dir.add_reminder("first", 2, now).unwrap();
        dir.add_reminder("later", 60, now).unwrap();

        assert!(dir.take_due_reminders(now + Duration::seconds(1)).is_empty());

        let due = dir.take_due_reminders(now + Duration::seconds(5));
        let texts: Vec<_> = due.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["second", "first"]);
        assert_eq!(dir.reminders().len(), 1);

        // Fired reminders never fire again.
        assert!(dir.take_due_reminders(now + Duration::seconds(5)).is_empty());
    }
}
