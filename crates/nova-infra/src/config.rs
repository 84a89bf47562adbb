//! Configuration loader for Nova.
//!
//! Reads `config.toml` from the data directory (`~/.nova/` in production)
//! and deserializes it into [`NovaConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::Path;

use nova_types::config::NovaConfig;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`NovaConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_config(data_dir: &Path) -> NovaConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return NovaConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return NovaConfig::default();
        }
    };

    match toml::from_str::<NovaConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            NovaConfig::default()
        }
    }
}
