//! Shared domain types for Nova.
//!
//! This crate contains the types passed between the assistant's layers:
//! chat messages, contacts and reminders, parsed action tags, session
//! events, configuration, and the error enums used at every port.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod action;
pub mod chat;
pub mod config;
pub mod directory;
pub mod error;
pub mod event;
pub mod llm;
