//! Reminder firing.

pub mod scheduler;
