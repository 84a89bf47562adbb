//! Configuration types for Nova.
//!
//! `NovaConfig` represents `config.toml` in the data directory. Every field
//! has a default, so an empty or missing file yields a working assistant.

use serde::{Deserialize, Serialize};

use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NovaConfig {
    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub handoff: HandoffConfig,
}

/// Timings and storage key for the assistant core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Delay between speaking a confirmation and executing its action.
    #[serde(default = "default_action_delay_ms")]
    pub action_delay_ms: u64,

    /// Delay before a recalled memory is spoken.
    #[serde(default = "default_recall_reply_delay_ms")]
    pub recall_reply_delay_ms: u64,

    /// Delay between `close_app('nova')` and the session ending.
    #[serde(default = "default_termination_delay_ms")]
    pub termination_delay_ms: u64,

    /// Reminder scheduler tick period.
    #[serde(default = "default_reminder_poll_ms")]
    pub reminder_poll_ms: u64,

    /// Blob key under which the memory store is persisted.
    #[serde(default = "default_memory_blob_key")]
    pub memory_blob_key: String,
}

fn default_action_delay_ms() -> u64 {
    500
}

fn default_recall_reply_delay_ms() -> u64 {
    300
}

fn default_termination_delay_ms() -> u64 {
    1_500
}

fn default_reminder_poll_ms() -> u64 {
    1_000
}

fn default_memory_blob_key() -> String {
    "novaKnowledgeBase".to_string()
}

impl AssistantConfig {
    pub fn action_delay(&self) -> Duration {
        Duration::from_millis(self.action_delay_ms)
    }

    pub fn recall_reply_delay(&self) -> Duration {
        Duration::from_millis(self.recall_reply_delay_ms)
    }

    pub fn termination_delay(&self) -> Duration {
        Duration::from_millis(self.termination_delay_ms)
    }

    pub fn reminder_poll(&self) -> Duration {
        Duration::from_millis(self.reminder_poll_ms)
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            action_delay_ms: default_action_delay_ms(),
            recall_reply_delay_ms: default_recall_reply_delay_ms(),
            termination_delay_ms: default_termination_delay_ms(),
            reminder_poll_ms: default_reminder_poll_ms(),
            memory_blob_key: default_memory_blob_key(),
        }
    }
}

/// Remote chat service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Text-to-speech settings. The engine is an external command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_speech_command")]
    pub command: String,

    /// Extra arguments placed before the text.
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_speech_command() -> String {
    if cfg!(target_os = "macos") {
        "say".to_string()
    } else {
        "espeak".to_string()
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: default_speech_command(),
            args: Vec::new(),
        }
    }
}

/// Visual capture settings. Without a snapshot path there is no camera.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraConfig {
    /// File that an external capture tool keeps refreshed with the latest frame.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

/// Telephony/messaging hand-off settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffConfig {
    /// Command that opens `tel:` and `https:` URLs on the host.
    #[serde(default = "default_opener")]
    pub opener: String,
}

fn default_opener() -> String {
    if cfg!(target_os = "macos") {
        "open".to_string()
    } else {
        "xdg-open".to_string()
    }
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            opener: default_opener(),
        }
    }
}
