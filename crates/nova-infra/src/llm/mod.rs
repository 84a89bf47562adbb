//! Remote chat backends.

pub mod gemini;
