//! Async readline input acting as the speech recognizer.
//!
//! Wraps `rustyline_async::Readline`. A submitted line is a final
//! transcription, Ctrl+C interrupts listening, and Ctrl+D ends input.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

use nova_core::speech::{Heard, SpeechRecognizer};
use nova_types::error::SpeechError;

/// Async input handler wrapping rustyline_async.
pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Create the input handler with the given prompt.
    ///
    /// Returns the handler and a `SharedWriter` for printing output without
    /// clobbering the prompt line.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    /// Clear the terminal screen.
    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }

    /// Restore the terminal before exiting.
    pub fn flush(&mut self) {
        let _ = self.rl.flush();
    }
}

impl SpeechRecognizer for ChatInput {
    async fn listen(&mut self) -> Result<Heard, SpeechError> {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                let line = line.trim().to_string();
                if !line.is_empty() {
                    self.rl.add_history_entry(line.clone());
                }
                Ok(Heard::Final(line))
            }
            Ok(ReadlineEvent::Interrupted) => Ok(Heard::Interrupted),
            Ok(ReadlineEvent::Eof) => Ok(Heard::Ended),
            Err(e) => Err(SpeechError::Recognition(e.to_string())),
        }
    }
}
