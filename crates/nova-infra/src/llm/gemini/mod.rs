//! Google Gemini `generateContent` backend.

pub mod client;
pub mod prompt;
pub mod types;
