//! Nova console entry point.
//!
//! Binary name: `nova`
//!
//! Parses CLI arguments, sets up tracing, loads configuration and the data
//! directory, then dispatches to the chat session or one of the maintenance
//! commands.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands, MemoryCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,nova=debug",
        _ => "trace",
    };

    nova_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions and reply inspection don't need app state
    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(*shell, &mut cmd, "nova", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Inspect { reply } => {
            cli::inspect::inspect_reply(reply, cli.json)?;
            return Ok(());
        }
        _ => {}
    }

    let state = AppState::init().await?;

    let result = match cli.command {
        Commands::Chat { mute } => cli::chat::loop_runner::run_chat_loop(&state, mute, cli.json).await,

        Commands::Memory { action } => match action {
            MemoryCommand::List => cli::memory::list_memory(&state, cli.json).await,
            MemoryCommand::Set { key, value } => {
                cli::memory::set_memory(&state, &key, &value, cli.json).await
            }
            MemoryCommand::Forget { key } => cli::memory::forget_memory(&state, &key, cli.json).await,
            MemoryCommand::Clear { force } => cli::memory::clear_memory(&state, force, cli.json).await,
        },

        Commands::Completions { .. } | Commands::Inspect { .. } => unreachable!("handled above"),
    };

    nova_observe::tracing_setup::shutdown_tracing();
    result
}
