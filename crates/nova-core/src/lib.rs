//! Business logic and port trait definitions for Nova.
//!
//! This crate holds the action protocol engine: the memory store and the
//! directory it mutates, the recall interceptor, the action tag parser and
//! dispatcher, the reminder scheduler, and the turn engine that ties them
//! to the speech, camera, telephony, and chat-service ports.
//!
//! It defines the ports the infrastructure layer (nova-infra) implements
//! and never depends on any concrete I/O.

pub mod action;
pub mod chat;
pub mod device;
pub mod directory;
pub mod event;
pub mod llm;
pub mod memory;
pub mod reminder;
pub mod speech;
