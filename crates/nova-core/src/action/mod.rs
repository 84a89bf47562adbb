//! The action protocol: tag parsing and dispatch.

pub mod dispatcher;
pub mod parser;
