//! Interactive console session for Nova.
//!
//! Typed lines stand in for final speech transcriptions; session events
//! are rendered as they arrive; slash commands inspect session state.
//! Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
