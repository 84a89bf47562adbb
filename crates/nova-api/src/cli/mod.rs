//! CLI command definitions for the `nova` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod inspect;
pub mod memory;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Nova, a voice-driven personal assistant.
#[derive(Parser)]
#[command(name = "nova", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive session. Typed lines stand in for speech.
    Chat {
        /// Disable spoken replies.
        #[arg(long)]
        mute: bool,
    },

    /// Inspect and edit the persisted memory store.
    #[command(alias = "mem")]
    Memory {
        #[command(subcommand)]
        action: MemoryCommand,
    },

    /// Show the visible text and the parsed action of a model reply.
    Inspect {
        /// Reply text, e.g. "Done. [ACTION:remember:key=color|value=blue]".
        reply: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum MemoryCommand {
    /// List every stored fact.
    #[command(alias = "ls")]
    List,

    /// Store a fact, replacing any existing value for the key.
    Set {
        key: String,
        value: String,
    },

    /// Remove a fact.
    #[command(alias = "rm")]
    Forget {
        key: String,
    },

    /// Remove every fact.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        force: bool,
    },
}
