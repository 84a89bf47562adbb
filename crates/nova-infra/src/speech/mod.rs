//! Speech output adapters.

pub mod command;

pub use command::{CommandSynthesizer, SystemVoice};
