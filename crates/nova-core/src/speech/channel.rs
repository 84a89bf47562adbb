//! Single audio output shared by every speaker in the session.
//!
//! Starting an utterance cancels whatever is playing. Each utterance hands
//! back an `Utterance` that resolves exactly once, whether the speech
//! finished, failed, or was cut off. Only the most recent utterance clears
//! the speaking flag.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::SpeechSynthesizer;
use crate::chat::status::StatusFlags;

/// Completion signal for one utterance.
#[derive(Debug)]
pub struct Utterance {
    done: Option<oneshot::Receiver<()>>,
}

impl Utterance {
    /// An utterance that had nothing to say.
    pub fn silent() -> Self {
        Self { done: None }
    }

    /// Wait until the utterance is over.
    pub async fn finished(self) {
        if let Some(done) = self.done {
            // A cancelled utterance drops its sender; that also counts as over.
            let _ = done.await;
        }
    }
}

pub struct SpeechChannel<S> {
    synthesizer: Arc<S>,
    flags: Arc<StatusFlags>,
    generation: Arc<AtomicU64>,
    current: Mutex<Option<JoinHandle<()>>>,
}

impl<S: SpeechSynthesizer> SpeechChannel<S> {
    pub fn new(synthesizer: Arc<S>, flags: Arc<StatusFlags>) -> Self {
        Self {
            synthesizer,
            flags,
            generation: Arc::new(AtomicU64::new(0)),
            current: Mutex::new(None),
        }
    }

    /// Speak `text`, cutting off anything already playing.
    pub fn speak(&self, text: impl Into<String>) -> Utterance {
        let text = text.into();
        if text.trim().is_empty() {
            return Utterance::silent();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (done_tx, done_rx) = oneshot::channel();

        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.take() {
            debug!("interrupting previous utterance");
            previous.abort();
        }

        self.flags.set_speaking(true);

        let synthesizer = Arc::clone(&self.synthesizer);
        let flags = Arc::clone(&self.flags);
        let latest = Arc::clone(&self.generation);
        *current = Some(tokio::spawn(async move {
            if let Err(e) = synthesizer.speak(&text).await {
                warn!(error = %e, "speech synthesis failed");
            }
            if latest.load(Ordering::SeqCst) == generation {
                flags.set_speaking(false);
            }
            let _ = done_tx.send(());
        }));

        Utterance {
            done: Some(done_rx),
        }
    }

    /// Stop whatever is playing.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.take() {
            previous.abort();
        }
        self.flags.set_speaking(false);
    }
}
