//! Infrastructure adapters for Nova.
//!
//! Implements the ports defined in nova-core against the real world: JSON
//! files for the memory blob, the Gemini REST API for the chat backend, an
//! external command for speech, a snapshot file for the camera, a capture
//! directory for saved photos, and the host URL opener for hand-offs.

pub mod config;
pub mod device;
pub mod filesystem;
pub mod llm;
pub mod speech;
pub mod storage;
