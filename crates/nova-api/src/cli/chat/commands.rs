//! Slash command parsing and session inspection for the chat loop.
//!
//! Commands start with `/` and never reach the assistant.

use chrono::{DateTime, Local, Utc};
use console::style;

use nova_core::chat::session::Session;
use nova_core::memory::store::MemoryStore;
use nova_types::chat::AssistantStatus;
use nova_types::directory::Reminder;

use super::renderer::{format_contacts, format_sources};

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    Status,
    Contacts,
    Reminders,
    Memory,
    Sources,
    /// Interrupt the current utterance.
    Stop,
    Clear,
    Exit,
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/status" => Some(ChatCommand::Status),
        "/contacts" => Some(ChatCommand::Contacts),
        "/reminders" => Some(ChatCommand::Reminders),
        "/memory" | "/mem" => Some(ChatCommand::Memory),
        "/sources" => Some(ChatCommand::Sources),
        "/stop" | "/hush" => Some(ChatCommand::Stop),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// The help text listing every command.
pub fn help_text() -> String {
    let rows = [
        ("/help", "Show this help message"),
        ("/status", "Show assistant status and session info"),
        ("/contacts", "List saved contacts"),
        ("/reminders", "List pending reminders"),
        ("/memory", "List remembered facts"),
        ("/sources", "Show web sources of the last search"),
        ("/stop", "Interrupt speech"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the session"),
    ];

    let mut out = format!("\n  {}\n", style("Available commands:").bold());
    for (cmd, desc) in rows {
        out.push_str(&format!("\n  {:<12} {desc}", style(cmd).cyan()));
    }
    out.push_str(&format!(
        "\n\n  {}\n",
        style("Ctrl+C interrupts speech, Ctrl+D exits").dim()
    ));
    out
}

/// Session summary for `/status`.
pub fn status_text(session: &Session, status: AssistantStatus) -> String {
    let id = session.id().to_string();
    format!(
        "  {}   {}\n  {}  {}\n  {}    {}\n  {} {}",
        style("Status:").bold(),
        style(status).cyan(),
        style("Session:").bold(),
        style(&id[..8.min(id.len())]).dim(),
        style("Turns:").bold(),
        session.turn_count(),
        style("Messages:").bold(),
        session.messages().len(),
    )
}

/// Pending reminders with their local due time.
pub fn reminders_text(reminders: &[Reminder], now: DateTime<Utc>) -> String {
    if reminders.is_empty() {
        return format!("  {}", style("No pending reminders.").dim());
    }

    reminders
        .iter()
        .map(|r| {
            let remaining = (r.due_time - now).num_seconds().max(0);
            let due: DateTime<Local> = r.due_time.with_timezone(&Local);
            format!(
                "  {} {} {}",
                style(due.format("%H:%M:%S")).yellow(),
                r.text,
                style(format!("(in {remaining}s)")).dim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remembered facts, one per line.
pub fn memory_text(memory: &MemoryStore) -> String {
    if memory.is_empty() {
        return format!("  {}", style("Memory is empty.").dim());
    }

    memory
        .entries()
        .map(|(k, v)| format!("  {}: {v}", style(k).cyan()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Output for an inspection command, or `None` for commands handled by the loop.
pub fn inspect(command: &ChatCommand, session: &Session, status: AssistantStatus) -> Option<String> {
    let text = match command {
        ChatCommand::Status => status_text(session, status),
        ChatCommand::Contacts => format_contacts(session.directory().contacts()),
        ChatCommand::Reminders => reminders_text(session.directory().reminders(), Utc::now()),
        ChatCommand::Memory => memory_text(session.memory()),
        ChatCommand::Sources if session.web_sources().is_empty() => {
            format!("  {}", style("No web sources for the last turn.").dim())
        }
        ChatCommand::Sources => format_sources(session.web_sources()),
        _ => return None,
    };
    Some(text)
}
