//! Text-to-speech through an external command (`say`, `espeak`, ...).
//!
//! The text is passed as the last argument. The child is killed when the
//! utterance future is dropped, which is how the speech channel cuts off an
//! interrupted utterance.

use std::process::Stdio;

use nova_core::speech::SpeechSynthesizer;
use nova_types::config::SpeechConfig;
use nova_types::error::SpeechError;

#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let status = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    SpeechError::Unavailable(format!("'{}' not found", self.program))
                }
                _ => SpeechError::Engine(e.to_string()),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(SpeechError::Engine(format!("'{}' exited with {status}", self.program)))
        }
    }
}

/// The synthesizer chosen from configuration.
///
/// `Silent` completes every utterance immediately, for hosts without a
/// speech engine or when speech is disabled.
#[derive(Debug, Clone)]
pub enum SystemVoice {
    Command(CommandSynthesizer),
    Silent,
}

impl SystemVoice {
    pub fn from_config(config: &SpeechConfig) -> Self {
        if config.enabled && !config.command.trim().is_empty() {
            SystemVoice::Command(CommandSynthesizer::new(
                config.command.clone(),
                config.args.clone(),
            ))
        } else {
            SystemVoice::Silent
        }
    }
}

impl SpeechSynthesizer for SystemVoice {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        match self {
            SystemVoice::Command(command) => command.speak(text).await,
            SystemVoice::Silent => Ok(()),
        }
    }
}
