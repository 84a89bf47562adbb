//! Application state wiring the adapters together.
//!
//! The turn engine is generic over its chat backend, synthesizer, and blob
//! store; AppState pins it to the concrete nova-infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::debug;

use nova_core::chat::engine::{Assistant, Devices};
use nova_core::device::VisualCapture;
use nova_infra::config::load_config;
use nova_infra::device::camera::SnapshotCamera;
use nova_infra::device::capture_dir::CaptureDirectory;
use nova_infra::device::handoff::UrlLauncher;
use nova_infra::filesystem::{captures_dir, resolve_data_dir, store_dir};
use nova_infra::llm::gemini::client::GeminiChatService;
use nova_infra::speech::SystemVoice;
use nova_infra::storage::json_blob::JsonFileBlobStore;
use nova_types::config::NovaConfig;

/// The assistant pinned to the infra implementations.
pub type ConcreteAssistant = Assistant<GeminiChatService, SystemVoice, JsonFileBlobStore>;

/// Shared state for every command.
#[derive(Clone)]
pub struct AppState {
    pub config: NovaConfig,
    pub data_dir: PathBuf,
    pub blob_store: JsonFileBlobStore,
}

impl AppState {
    /// Resolve the data directory and load configuration.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let config = load_config(&data_dir).await;
        let blob_store = JsonFileBlobStore::new(store_dir(&data_dir));
        debug!(data_dir = %data_dir.display(), "application state initialized");

        Ok(Self {
            config,
            data_dir,
            blob_store,
        })
    }

    /// Blob key the memory store is persisted under.
    pub fn memory_key(&self) -> &str {
        &self.config.assistant.memory_blob_key
    }

    /// Host devices described by the configuration.
    pub fn devices(&self) -> Devices {
        let camera = self
            .config
            .camera
            .snapshot_path
            .as_ref()
            .map(|path| Arc::new(SnapshotCamera::new(path)) as Arc<dyn VisualCapture>);

        Devices {
            camera,
            telephony: Arc::new(UrlLauncher::from_config(&self.config.handoff)),
            image_sink: Arc::new(CaptureDirectory::new(captures_dir(&self.data_dir))),
        }
    }

    /// Build a fresh session. `mute` overrides the configured speech output.
    pub async fn build_assistant(&self, mute: bool) -> anyhow::Result<Arc<ConcreteAssistant>> {
        let backend = GeminiChatService::from_config(&self.config.llm)
            .context("failed to set up the chat service")?;

        let mut speech = self.config.speech.clone();
        if mute {
            speech.enabled = false;
        }

        Ok(Assistant::new(
            self.config.assistant.clone(),
            backend,
            SystemVoice::from_config(&speech),
            self.blob_store.clone(),
            self.devices(),
        )
        .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_in(dir: &std::path::Path, config: NovaConfig) -> AppState {
        AppState {
            config,
            data_dir: dir.to_path_buf(),
            blob_store: JsonFileBlobStore::new(store_dir(dir)),
        }
    }

    #[test]
    fn test_devices_without_snapshot_have_no_camera() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path(), NovaConfig::default());
        assert!(state.devices().camera.is_none());
    }

    #[test]
    fn test_devices_with_snapshot_have_camera() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = NovaConfig::default();
        config.camera.snapshot_path = Some(dir.path().join("frame.jpg"));
        let state = state_in(dir.path(), config);
        assert!(state.devices().camera.is_some());
    }

    #[test]
    fn test_memory_key_follows_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = NovaConfig::default();
        config.assistant.memory_blob_key = "customKey".to_string();
        let state = state_in(dir.path(), config);
        assert_eq!(state.memory_key(), "customKey");
    }
}
