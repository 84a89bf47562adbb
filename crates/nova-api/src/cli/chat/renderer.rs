//! Session event rendering.
//!
//! The renderer follows the session only through its event bus. Lines are
//! written through rustyline's `SharedWriter` so they appear above the
//! prompt instead of through it.

use std::io::Write;
use std::time::Duration;

use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use nova_types::chat::{AssistantStatus, ChatMessage, MessageRole, WebSource};
use nova_types::directory::Contact;
use nova_types::event::SessionEvent;

pub const TERMINATED_BANNER: &str = "NOVA SESSION TERMINATED";

/// Format one log message. User lines are already on screen as typed input.
pub fn format_message(message: &ChatMessage) -> Option<String> {
    match message.role {
        MessageRole::User => None,
        MessageRole::Assistant => Some(format!(
            "  {} {}",
            style("Nova >").cyan().bold(),
            message.text
        )),
        MessageRole::System if message.text.starts_with("REMINDER:") => {
            Some(format!("  {}", style(&message.text).yellow().bold()))
        }
        MessageRole::System => Some(format!("  {} {}", style("·").dim(), style(&message.text).dim())),
    }
}

/// Contacts as a table.
pub fn format_contacts(contacts: &[Contact]) -> String {
    if contacts.is_empty() {
        return format!("  {}", style("No contacts saved.").dim());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Phone").fg(Color::White),
    ]);
    for contact in contacts {
        table.add_row(vec![
            Cell::new(&contact.name).fg(Color::Cyan),
            Cell::new(&contact.phone).fg(Color::White),
        ]);
    }
    table.to_string()
}

/// Numbered list of web sources.
pub fn format_sources(sources: &[WebSource]) -> String {
    let mut out = format!("  {}", style("Sources:").bold());
    for (i, source) in sources.iter().enumerate() {
        out.push_str(&format!(
            "\n  {}. {} {}",
            i + 1,
            source.title,
            style(&source.uri).dim()
        ));
    }
    out
}

/// Styled text for an event, or `None` when it has nothing to show.
pub fn format_event(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::MessageAppended { message } => format_message(message),
        SessionEvent::ContactsShown { contacts } => Some(format_contacts(contacts)),
        SessionEvent::WebSourcesUpdated { sources } if !sources.is_empty() => {
            Some(format_sources(sources))
        }
        SessionEvent::WebSourcesUpdated { .. } => None,
        SessionEvent::PhotoCaptured => Some(format!(
            "  {} {}",
            style("[camera]").magenta(),
            style("Frame held").dim()
        )),
        SessionEvent::PhotoCleared => Some(format!(
            "  {} {}",
            style("[camera]").magenta(),
            style("Live feed resumed").dim()
        )),
        // Announced by its own log message.
        SessionEvent::ReminderFired { .. } => None,
        SessionEvent::StatusChanged { .. } => None,
        SessionEvent::SessionTerminated => {
            Some(format!("\n  {}\n", style(TERMINATED_BANNER).red().bold()))
        }
    }
}

/// Writes events to the terminal and drives the thinking spinner.
pub struct EventRenderer<W> {
    out: W,
    json: bool,
    spinner: Option<ProgressBar>,
}

impl<W: Write> EventRenderer<W> {
    pub fn new(out: W, json: bool) -> Self {
        Self {
            out,
            json,
            spinner: None,
        }
    }

    pub fn render(&mut self, event: &SessionEvent) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => {
                    let _ = writeln!(self.out, "{line}");
                }
                Err(e) => warn!(error = %e, "failed to serialize session event"),
            }
            return;
        }

        if let SessionEvent::StatusChanged { status } = event {
            self.update_spinner(*status);
        }
        if let Some(text) = format_event(event) {
            let _ = writeln!(self.out, "{text}");
        }
    }

    fn update_spinner(&mut self, status: AssistantStatus) {
        match status {
            AssistantStatus::Thinking if self.spinner.is_none() => {
                let spinner = ProgressBar::new_spinner();
                if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                    spinner.set_style(spinner_style);
                }
                spinner.set_message("thinking...");
                spinner.enable_steady_tick(Duration::from_millis(80));
                self.spinner = Some(spinner);
            }
            AssistantStatus::Thinking => {}
            _ => {
                if let Some(spinner) = self.spinner.take() {
                    spinner.finish_and_clear();
                }
            }
        }
    }
}

impl<W> Drop for EventRenderer<W> {
    fn drop(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

/// Render events until the session shuts down, then drain what is left.
pub async fn run_renderer<W: Write>(
    mut events: broadcast::Receiver<SessionEvent>,
    mut renderer: EventRenderer<W>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            received = events.recv() => match received {
                Ok(event) => renderer.render(&event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "renderer fell behind; events dropped");
                }
                Err(RecvError::Closed) => return,
            },
            _ = shutdown.cancelled() => break,
        }
    }

    while let Ok(event) = events.try_recv() {
        renderer.render(&event);
    }
}
