//! Remote chat service port.

pub mod backend;
