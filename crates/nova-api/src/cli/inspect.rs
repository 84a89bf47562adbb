//! `nova inspect`: split a model reply into spoken text and action.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use nova_core::action::parser::parse_reply;
use nova_types::action::ParsedReply;

/// Print how the assistant would treat `reply`.
///
/// # Examples
///
/// ```bash
/// nova inspect "Saved. [ACTION:remember:key=color|value=blue]"
/// nova inspect "Hello there" --json
/// ```
pub fn inspect_reply(reply: &str, json: bool) -> Result<()> {
    let parsed = parse_reply(reply);

    if json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(());
    }

    println!();
    for line in describe(&parsed) {
        println!("  {line}");
    }

    if let Some(action) = parsed.action.as_ref().filter(|a| !a.params.is_empty()) {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL_CONDENSED);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("Param").fg(Color::White),
            Cell::new("Value").fg(Color::White),
        ]);
        for (key, value) in action.params.iter() {
            table.add_row(vec![
                Cell::new(key).fg(Color::Cyan),
                Cell::new(value).fg(Color::White),
            ]);
        }
        println!();
        println!("{table}");
    }
    println!();

    Ok(())
}

/// Human-readable summary lines for a parsed reply.
fn describe(parsed: &ParsedReply) -> Vec<String> {
    let mut lines = vec![format!(
        "{}  {}",
        style("Spoken:").bold(),
        if parsed.visible_text.is_empty() {
            style("(nothing)").dim().to_string()
        } else {
            parsed.visible_text.clone()
        }
    )];

    match &parsed.action {
        None => lines.push(format!("{}  {}", style("Action:").bold(), style("none").dim())),
        Some(action) => {
            let known = match action.kind() {
                Some(_) => style("known").green(),
                None => style("unknown, ignored").yellow(),
            };
            lines.push(format!(
                "{}  {} ({known})",
                style("Action:").bold(),
                style(&action.name).cyan()
            ));
            if !action.raw_params.is_empty() {
                lines.push(format!(
                    "{}  {}",
                    style("Raw:").bold(),
                    style(&action.raw_params).dim()
                ));
            }
        }
    }

    lines
}
