//! Turn engine: one user utterance in, replies and side effects out.
//!
//! A turn is answered from memory if the recall interceptor matches.
//! Otherwise it goes to the chat backend along one of three routes, the
//! reply is spoken, and any action tag is dispatched after a short delay.
//! Only one backend request is in flight at a time; messages that arrive
//! meanwhile are dropped, not queued.

use std::sync::Arc;

use chrono::Utc;
use nova_types::action::ParsedAction;
use nova_types::chat::{AssistantStatus, CapturedImage, ChatMessage, WebSource};
use nova_types::config::AssistantConfig;
use nova_types::event::SessionEvent;
use nova_types::llm::LlmError;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::action::dispatcher::{ActionDispatcher, ActionEffect};
use crate::action::parser::parse_reply;
use crate::chat::router::{QueryRoute, route_query};
use crate::chat::session::{GREETING, Session};
use crate::chat::status::StatusFlags;
use crate::device::{ImageSink, Telephony, VisualCapture};
use crate::event::bus::EventBus;
use crate::llm::backend::ChatBackend;
use crate::memory::recall::{Recall, RecallInterceptor};
use crate::memory::store::{BlobStore, load_memory};
use crate::reminder::scheduler::{ReminderScheduler, reminder_message};
use crate::speech::SpeechSynthesizer;
use crate::speech::channel::{SpeechChannel, Utterance};

/// Spoken and logged when the chat backend fails.
pub const CONNECTION_ERROR: &str =
    "Error communicating with Nova Core. Please check your connection or API key.";

const ANALYZING_IMAGE: &str = "Analyzing visual input...";
const NO_IMAGE: &str = "I couldn't get an image from the camera. Please try again.";
const SEARCHING: &str = "Searching the web...";

/// Host devices available to the assistant.
#[derive(Clone)]
pub struct Devices {
    pub camera: Option<Arc<dyn VisualCapture>>,
    pub telephony: Arc<dyn Telephony>,
    pub image_sink: Arc<dyn ImageSink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input, a request already in flight, or a terminated session.
    Ignored,
    Recalled { key: String },
    Replied { action: Option<String> },
    Visual,
    NoImage,
    Grounded { sources: usize },
    Failed,
}

/// What a turn did, with handles to the work it left running.
#[derive(Debug)]
pub struct TurnReport {
    pub outcome: TurnOutcome,
    pub utterance: Utterance,
    /// Delayed recall reply or action dispatch.
    pub deferred: Option<JoinHandle<()>>,
}

impl TurnReport {
    fn ignored() -> Self {
        Self {
            outcome: TurnOutcome::Ignored,
            utterance: Utterance::silent(),
            deferred: None,
        }
    }

    /// Wait for the spoken reply and any deferred work to finish.
    pub async fn settle(self) {
        self.utterance.finished().await;
        if let Some(deferred) = self.deferred {
            if let Err(e) = deferred.await {
                warn!(error = %e, "deferred turn work did not complete");
            }
        }
    }
}

pub struct Assistant<C, S, B> {
    config: AssistantConfig,
    session: Arc<Mutex<Session>>,
    flags: Arc<StatusFlags>,
    events: EventBus,
    backend: C,
    speech: Arc<SpeechChannel<S>>,
    blob_store: B,
    dispatcher: ActionDispatcher,
    devices: Devices,
    recall: RecallInterceptor,
    shutdown: CancellationToken,
}

impl<C, S, B> Assistant<C, S, B>
where
    C: ChatBackend,
    S: SpeechSynthesizer,
    B: BlobStore + 'static,
{
    /// Create the session, loading the memory store from `blob_store`.
    pub async fn new(
        config: AssistantConfig,
        backend: C,
        synthesizer: S,
        blob_store: B,
        devices: Devices,
    ) -> Arc<Self> {
        let events = EventBus::default();
        let flags = Arc::new(StatusFlags::new(events.clone()));
        let memory = load_memory(&blob_store, &config.memory_blob_key).await;
        let session = Session::new(memory, events.clone());
        info!(
            session_id = %session.id(),
            memory_entries = session.memory().len(),
            camera = devices.camera.is_some(),
            "session created"
        );

        Arc::new(Self {
            speech: Arc::new(SpeechChannel::new(Arc::new(synthesizer), Arc::clone(&flags))),
            dispatcher: ActionDispatcher::new(devices.camera.clone()),
            session: Arc::new(Mutex::new(session)),
            recall: RecallInterceptor::new(),
            shutdown: CancellationToken::new(),
            config,
            flags,
            events,
            backend,
            blob_store,
            devices,
        })
    }

    /// Greet and start the reminder scheduler. The scheduler stops when the
    /// session ends or `shutdown` is called.
    pub async fn start(self: &Arc<Self>) -> JoinHandle<()> {
        self.append(ChatMessage::system(GREETING)).await;

        let speech = Arc::clone(&self.speech);
        ReminderScheduler::new(
            Arc::clone(&self.session),
            self.events.clone(),
            self.config.reminder_poll(),
            self.shutdown.clone(),
        )
        .spawn(move |reminder| {
            speech.speak(reminder_message(reminder));
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn session(&self) -> &Arc<Mutex<Session>> {
        &self.session
    }

    pub fn status(&self) -> AssistantStatus {
        self.flags.status()
    }

    pub fn is_active(&self) -> bool {
        self.flags.is_active()
    }

    /// Cancelled once the session has ended or `shutdown` was called.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn stop_speaking(&self) {
        self.speech.cancel();
    }

    pub fn shutdown(&self) {
        self.speech.cancel();
        self.shutdown.cancel();
    }

    /// Handle one final transcription from the user.
    pub async fn handle_utterance(self: &Arc<Self>, text: &str) -> TurnReport {
        if text.trim().is_empty() || !self.flags.is_active() {
            return TurnReport::ignored();
        }

        {
            let mut session = self.session.lock().await;
            if let Some(recall) = self.recall.intercept(text, session.memory()) {
                debug!(key = %recall.key, "answering from memory");
                session.append(ChatMessage::user(text));
                return TurnReport {
                    outcome: TurnOutcome::Recalled {
                        key: recall.key.clone(),
                    },
                    utterance: Utterance::silent(),
                    deferred: Some(self.spawn_recall_reply(recall)),
                };
            }
        }

        if !self.flags.try_begin_loading() {
            debug!("request already in flight, dropping message");
            return TurnReport::ignored();
        }

        let route = route_query(text, self.devices.camera.is_some());
        {
            let mut session = self.session.lock().await;
            session.replace_web_sources(Vec::new());
            session.append(ChatMessage::user(text));
            session.increment_turn();
        }
        info!(?route, "handling user message");

        let result = match route {
            QueryRoute::Visual => self.visual_turn(text).await,
            QueryRoute::Search => self.grounded_turn(text).await,
            QueryRoute::Chat => self.chat_turn(text).await,
        };

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "chat backend request failed");
                self.system_reply(TurnOutcome::Failed, CONNECTION_ERROR).await
            }
        };
        self.flags.finish_loading();
        report
    }

    // ------------------------------------------------------------------
    // Routes
    // ------------------------------------------------------------------

    async fn visual_turn(self: &Arc<Self>, text: &str) -> Result<TurnReport, LlmError> {
        let frame = self
            .devices
            .camera
            .as_ref()
            .and_then(|camera| camera.capture());
        let Some(bytes) = frame else {
            return Ok(self.system_reply(TurnOutcome::NoImage, NO_IMAGE).await);
        };

        self.append(ChatMessage::system(ANALYZING_IMAGE)).await;
        let reply = self
            .backend
            .send_visual_query(text, &CapturedImage::jpeg(bytes))
            .await?;
        Ok(self.assistant_reply(TurnOutcome::Visual, reply.trim()).await)
    }

    async fn grounded_turn(self: &Arc<Self>, text: &str) -> Result<TurnReport, LlmError> {
        self.append(ChatMessage::system(SEARCHING)).await;
        let reply = self.backend.send_grounded_query(text).await?;

        let sources = normalize_sources(reply.sources);
        let count = sources.len();
        self.session.lock().await.replace_web_sources(sources);
        debug!(sources = count, "grounded reply received");

        Ok(self
            .assistant_reply(TurnOutcome::Grounded { sources: count }, reply.text.trim())
            .await)
    }

    async fn chat_turn(self: &Arc<Self>, text: &str) -> Result<TurnReport, LlmError> {
        let reply = self.backend.send_message(text).await?;
        let parsed = parse_reply(&reply);

        let outcome = TurnOutcome::Replied {
            action: parsed.action.as_ref().map(|a| a.name.clone()),
        };
        let mut report = self.assistant_reply(outcome, &parsed.visible_text).await;

        // Scheduled after speech has started; it may run before speech ends.
        if let Some(action) = parsed.action {
            report.deferred = Some(self.spawn_action(action));
        }
        Ok(report)
    }

    // ------------------------------------------------------------------
    // Replies
    // ------------------------------------------------------------------

    async fn append(&self, message: ChatMessage) {
        self.session.lock().await.append(message);
    }

    /// Log and speak model text. Empty text is neither logged nor spoken.
    async fn assistant_reply(&self, outcome: TurnOutcome, text: &str) -> TurnReport {
        if !text.is_empty() {
            self.append(ChatMessage::assistant(text)).await;
        }
        TurnReport {
            outcome,
            utterance: self.speech.speak(text),
            deferred: None,
        }
    }

    async fn system_reply(&self, outcome: TurnOutcome, text: &str) -> TurnReport {
        self.append(ChatMessage::system(text)).await;
        TurnReport {
            outcome,
            utterance: self.speech.speak(text),
            deferred: None,
        }
    }

    fn spawn_recall_reply(self: &Arc<Self>, recall: Recall) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(this.config.recall_reply_delay()).await;
            let reply = recall.reply();
            this.append(ChatMessage::system(reply.clone())).await;
            this.speech.speak(reply).finished().await;
        })
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    fn spawn_action(self: &Arc<Self>, action: ParsedAction) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(this.config.action_delay()).await;
            this.execute_action(&action).await;
        })
    }

    /// Dispatch an action now and carry out its effects.
    pub async fn execute_action(self: &Arc<Self>, action: &ParsedAction) {
        if !self.flags.is_active() {
            debug!(action = %action.name, "session ended, skipping action");
            return;
        }

        let effects = {
            let mut session = self.session.lock().await;
            let outcome = self
                .dispatcher
                .dispatch(action, session.action_state(), Utc::now());
            if let Some(status) = outcome.status {
                session.append(ChatMessage::system(status));
            }
            if outcome.effects.contains(&ActionEffect::PersistMemory) {
                // Saved while locked so the persisted blob never goes backwards.
                self.persist_memory(&session).await;
            }
            outcome.effects
        };

        for effect in effects {
            self.apply_effect(effect);
        }
    }

    async fn persist_memory(&self, session: &Session) {
        let result = match session.memory().to_blob() {
            Ok(blob) => {
                self.blob_store
                    .save(&self.config.memory_blob_key, &blob)
                    .await
            }
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => debug!(entries = session.memory().len(), "memory store saved"),
            Err(e) => warn!(error = %e, "failed to save memory store"),
        }
    }

    fn apply_effect(self: &Arc<Self>, effect: ActionEffect) {
        match effect {
            ActionEffect::PhotoCaptured => self.events.publish(SessionEvent::PhotoCaptured),
            ActionEffect::PhotoCleared => self.events.publish(SessionEvent::PhotoCleared),
            ActionEffect::ShowContacts(contacts) => {
                self.events.publish(SessionEvent::ContactsShown { contacts })
            }
            ActionEffect::SaveImage(image) => self.devices.image_sink.save(&image),
            ActionEffect::PersistMemory => {}
            ActionEffect::Dial { phone } => self.devices.telephony.dial(&phone),
            ActionEffect::OpenChat { phone, text } => {
                self.devices.telephony.open_chat(&phone, &text)
            }
            ActionEffect::TerminateSession => self.spawn_termination(),
        }
    }

    fn spawn_termination(self: &Arc<Self>) {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(this.config.termination_delay()).await;
            this.session.lock().await.mark_terminated();
            this.flags.terminate();
            this.events.publish(SessionEvent::SessionTerminated);
            info!("session terminated");
            this.shutdown.cancel();
        });
    }
}

/// Drop sources without a URI; an empty title falls back to the URI.
pub fn normalize_sources(sources: Vec<WebSource>) -> Vec<WebSource> {
    sources
        .into_iter()
        .filter(|s| !s.uri.trim().is_empty())
        .map(|s| {
            let title = if s.title.trim().is_empty() {
                s.uri.clone()
            } else {
                s.title
            };
            WebSource { uri: s.uri, title }
        })
        .collect()
}
