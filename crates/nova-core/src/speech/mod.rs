//! Speech ports and the last-writer-wins output channel.

pub mod channel;

use nova_types::error::SpeechError;

/// Text-to-speech engine.
///
/// The returned future completes when the utterance has finished playing,
/// successfully or not. Dropping it must stop playback.
pub trait SpeechSynthesizer: Send + Sync + 'static {
    fn speak(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), SpeechError>> + Send;
}

/// What one listening session produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heard {
    /// A final transcription.
    Final(String),
    /// Listening was interrupted without a result.
    Interrupted,
    /// The input source is gone; no more results will arrive.
    Ended,
}

/// Speech-to-text capture.
///
/// Calling `listen` starts listening; dropping the future stops it.
/// Errors are not fatal: the caller goes back to listening.
pub trait SpeechRecognizer: Send {
    fn listen(&mut self) -> impl std::future::Future<Output = Result<Heard, SpeechError>> + Send;
}
