//! Main chat loop orchestration.
//!
//! Wires the assistant to the console: a renderer task follows the event
//! bus, typed lines are delivered as final transcriptions, and the loop ends
//! on `/exit`, Ctrl+D, or when the assistant terminates its own session.

use std::io::Write;
use std::sync::Arc;

use console::style;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use nova_core::chat::engine::{Assistant, TurnOutcome};
use nova_core::llm::backend::ChatBackend;
use nova_core::memory::store::BlobStore;
use nova_core::speech::{Heard, SpeechRecognizer, SpeechSynthesizer};

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::ChatInput;
use super::renderer::{EventRenderer, run_renderer};

/// Handle one transcription in its own task so the loop keeps listening.
///
/// A line that arrives while a request is in flight is dropped by the
/// engine's busy guard rather than queued behind it.
pub fn spawn_turn<C, S, B>(
    assistant: &Arc<Assistant<C, S, B>>,
    text: String,
) -> JoinHandle<TurnOutcome>
where
    C: ChatBackend,
    S: SpeechSynthesizer,
    B: BlobStore + 'static,
{
    let assistant = Arc::clone(assistant);
    tokio::spawn(async move {
        let report = assistant.handle_utterance(&text).await;
        debug!(outcome = ?report.outcome, "turn handled");
        report.outcome
    })
}

/// Run an interactive session until it ends.
pub async fn run_chat_loop(state: &AppState, mute: bool, json: bool) -> anyhow::Result<()> {
    let assistant = state.build_assistant(mute).await?;

    // Subscribe before `start` so the greeting is rendered.
    let events = assistant.subscribe();
    let session_id = assistant.session().lock().await.id().to_string();

    if !json {
        print_welcome_banner(
            &state.config.llm.model,
            &session_id,
            state.config.speech.enabled && !mute,
            state.config.camera.snapshot_path.is_some(),
        );
    }

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut input, writer) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    let mut out = writer.clone();
    let shutdown = assistant.shutdown_token();
    let renderer = tokio::spawn(run_renderer(
        events,
        EventRenderer::new(writer, json),
        shutdown.clone(),
    ));
    let scheduler = assistant.start().await;
    info!(session_id = %session_id, "chat session started");

    loop {
        let heard = tokio::select! {
            _ = shutdown.cancelled() => break,
            heard = input.listen() => heard,
        };

        let text = match heard {
            Ok(Heard::Final(text)) => text,
            Ok(Heard::Interrupted) => {
                assistant.stop_speaking();
                continue;
            }
            Ok(Heard::Ended) => break,
            Err(e) => {
                warn!(error = %e, "input error; listening again");
                continue;
            }
        };

        if text.is_empty() {
            continue;
        }

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => {
                    let _ = writeln!(out, "{}", commands::help_text());
                }
                ChatCommand::Stop => assistant.stop_speaking(),
                ChatCommand::Clear => input.clear(),
                ChatCommand::Exit => break,
                ChatCommand::Unknown(name) => {
                    let _ = writeln!(
                        out,
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                }
                inspection => {
                    let session = assistant.session().lock().await;
                    if let Some(text) = commands::inspect(&inspection, &session, assistant.status()) {
                        let _ = writeln!(out, "\n{text}\n");
                    }
                }
            }
            continue;
        }

        spawn_turn(&assistant, text);
    }

    assistant.shutdown();
    if let Err(e) = scheduler.await {
        warn!(error = %e, "reminder scheduler did not stop cleanly");
    }
    if let Err(e) = renderer.await {
        warn!(error = %e, "renderer did not stop cleanly");
    }
    input.flush();

    let session = assistant.session().lock().await;
    info!(
        session_id = %session_id,
        turns = session.turn_count(),
        terminated = session.ended_at().is_some(),
        "chat session ended"
    );
    if session.ended_at().is_none() && !json {
        println!("\n  {}", style("Session ended.").dim());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    use nova_core::chat::engine::Devices;
    use nova_core::device::{ImageSink, Telephony};
    use nova_types::chat::{AssistantStatus, CapturedImage, MessageRole};
    use nova_types::config::AssistantConfig;
    use nova_types::error::{RepositoryError, SpeechError};
    use nova_types::llm::{GroundedReply, LlmError};
    use tokio::sync::Notify;

    /// Replies only once the test releases it.
    struct GatedBackend {
        release: Arc<Notify>,
    }

    impl ChatBackend for GatedBackend {
        async fn send_message(&self, _text: &str) -> Result<String, LlmError> {
            self.release.notified().await;
            Ok("Done.".to_string())
        }

        async fn send_visual_query(&self, _text: &str, _image: &CapturedImage) -> Result<String, LlmError> {
            Err(LlmError::EmptyResponse)
        }

        async fn send_grounded_query(&self, _text: &str) -> Result<GroundedReply, LlmError> {
            Err(LlmError::EmptyResponse)
        }
    }

    struct Quiet;

    impl SpeechSynthesizer for Quiet {
        async fn speak(&self, _text: &str) -> Result<(), SpeechError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Blobs(StdMutex<HashMap<String, String>>);

    impl BlobStore for Blobs {
        async fn load(&self, key: &str) -> Result<Option<String>, RepositoryError> {
            Ok(self.0.lock().unwrap().get(key).cloned())
        }

        async fn save(&self, key: &str, blob: &str) -> Result<(), RepositoryError> {
            self.0.lock().unwrap().insert(key.to_string(), blob.to_string());
            Ok(())
        }
    }

    struct NoDevice;

    impl Telephony for NoDevice {
        fn dial(&self, _phone: &str) {}
        fn open_chat(&self, _phone: &str, _text: &str) {}
    }

    impl ImageSink for NoDevice {
        fn save(&self, _image: &CapturedImage) {}
    }

    #[tokio::test]
    async fn test_line_during_request_is_dropped_not_queued() {
        let release = Arc::new(Notify::new());
        let blobs = Blobs::default();
        blobs.0.lock().unwrap().insert(
            "novaKnowledgeBase".to_string(),
            r#"{"phone number":"555-1234"}"#.to_string(),
        );
        let assistant = Assistant::new(
            AssistantConfig::default(),
            GatedBackend {
                release: Arc::clone(&release),
            },
            Quiet,
            blobs,
            Devices {
                camera: None,
                telephony: Arc::new(NoDevice),
                image_sink: Arc::new(NoDevice),
            },
        )
        .await;

        let first = spawn_turn(&assistant, "tell me a joke".to_string());
        while assistant.status() != AssistantStatus::Thinking {
            tokio::task::yield_now().await;
        }

        let second = spawn_turn(&assistant, "and another".to_string());
        assert_eq!(second.await.unwrap(), TurnOutcome::Ignored);

        let recall = spawn_turn(&assistant, "what is my phone number?".to_string());
        assert_eq!(
            recall.await.unwrap(),
            TurnOutcome::Recalled {
                key: "phone number".to_string()
            }
        );

        release.notify_one();
        assert_eq!(first.await.unwrap(), TurnOutcome::Replied { action: None });

        let users = assistant
            .session()
            .lock()
            .await
            .messages()
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .count();
        assert_eq!(users, 2);
    }
}
