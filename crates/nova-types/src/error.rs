use thiserror::Error;

/// Errors from the blob store that persists the memory store.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors from the directory (contacts and reminders).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("a contact named '{0}' already exists")]
    ContactExists(String),

    #[error("contact '{0}' not found")]
    ContactNotFound(String),

    #[error("reminder must be due in the future")]
    ReminderNotInFuture,

    #[error("reminder due time is out of range")]
    ReminderOutOfRange,
}

/// Errors from the speech subsystems.
///
/// Never fatal: a failed utterance still completes, and a failed
/// recognition resets the assistant to listening.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech output unavailable: {0}")]
    Unavailable(String),

    #[error("speech engine failed: {0}")]
    Engine(String),

    #[error("recognition failed: {0}")]
    Recognition(String),
}
