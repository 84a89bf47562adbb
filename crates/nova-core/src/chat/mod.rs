//! The conversational session and the turn engine that drives it.

pub mod engine;
pub mod router;
pub mod session;
pub mod status;
