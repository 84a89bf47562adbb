//! Memory store CLI commands: list, set, forget, clear.
//!
//! Operate on the same persisted blob the assistant loads at session start,
//! so facts set here are recalled in the next `nova chat`.

use anyhow::{Context, Result};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use dialoguer::Confirm;

use nova_core::memory::store::{BlobStore, MemoryStore, load_memory};

use crate::state::AppState;

async fn save(state: &AppState, memory: &MemoryStore) -> Result<()> {
    let blob = memory.to_blob()?;
    state
        .blob_store
        .save(state.memory_key(), &blob)
        .await
        .context("failed to save the memory store")
}

/// Entries as a JSON object, in stored order.
fn to_json(memory: &MemoryStore) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = memory
        .entries()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
        .collect();
    serde_json::Value::Object(map)
}

/// List every stored fact.
///
/// # Examples
///
/// ```bash
/// nova memory list
/// nova memory list --json
/// ```
pub async fn list_memory(state: &AppState, json: bool) -> Result<()> {
    let memory = load_memory(&state.blob_store, state.memory_key()).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&to_json(&memory))?);
        return Ok(());
    }

    if memory.is_empty() {
        println!();
        println!(
            "  {} Memory is empty. Ask Nova to remember something, or run {}.",
            style("i").blue().bold(),
            style("nova memory set <key> <value>").cyan(),
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Key").fg(Color::White),
        Cell::new("Value").fg(Color::White),
    ]);

    for (key, value) in memory.entries() {
        table.add_row(vec![
            Cell::new(key).fg(Color::Cyan),
            Cell::new(value).fg(Color::White),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} entr{}",
        style(memory.len()).bold(),
        if memory.len() == 1 { "y" } else { "ies" }
    );
    println!();

    Ok(())
}

/// Store a fact. An existing key (any casing) keeps its casing and gets the new value.
pub async fn set_memory(state: &AppState, key: &str, value: &str, json: bool) -> Result<()> {
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        anyhow::bail!("both a key and a value are required");
    }

    let mut memory = load_memory(&state.blob_store, state.memory_key()).await;
    let replaced = memory.remember(key, value);
    save(state, &memory).await?;

    if json {
        let out = serde_json::json!({
            "key": key,
            "value": value,
            "replaced": replaced,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "\n  {} {} '{}'\n",
            style("✓").green().bold(),
            if replaced { "Updated" } else { "Remembered" },
            style(key).cyan()
        );
    }

    Ok(())
}

/// Remove a fact, matching the key case-insensitively.
pub async fn forget_memory(state: &AppState, key: &str, json: bool) -> Result<()> {
    let mut memory = load_memory(&state.blob_store, state.memory_key()).await;
    let removed = memory.forget(key);
    if removed {
        save(state, &memory).await?;
    }

    if json {
        let out = serde_json::json!({ "key": key, "removed": removed });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if removed {
        println!("\n  {} Forgot '{}'\n", style("✓").green().bold(), style(key).cyan());
    } else {
        println!(
            "\n  {} No fact stored under '{}'\n",
            style("!").yellow().bold(),
            style(key).cyan()
        );
    }

    Ok(())
}

/// Remove every fact, asking first unless `force`.
pub async fn clear_memory(state: &AppState, force: bool, json: bool) -> Result<()> {
    let mut memory = load_memory(&state.blob_store, state.memory_key()).await;
    let count = memory.len();

    if count > 0 && !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete all {count} stored facts?"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    memory.clear();
    save(state, &memory).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "removed": count }))?);
    } else {
        println!("\n  {} Cleared {count} fact(s)\n", style("✓").green().bold());
    }

    Ok(())
}
