//! Poll-based reminder scheduler.
//!
//! One recurring timer scans the directory each tick. Every due reminder is
//! removed, logged as `REMINDER: <text>`, published, and handed to the
//! caller's notifier (which speaks it). Firing is coarse: a reminder fires
//! on the first tick at or after its due time.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use nova_types::chat::ChatMessage;
use nova_types::directory::Reminder;
use nova_types::event::SessionEvent;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::chat::session::Session;
use crate::event::bus::EventBus;

/// Text logged and spoken when a reminder fires.
pub fn reminder_message(reminder: &Reminder) -> String {
    format!("REMINDER: {}", reminder.text)
}

/// Fire every reminder due at `now`, in insertion order.
pub fn fire_due(session: &mut Session, events: &EventBus, now: DateTime<Utc>) -> Vec<Reminder> {
    let due = session.directory_mut().take_due_reminders(now);
    for reminder in &due {
        info!(reminder_id = reminder.id, "reminder fired");
        session.append(ChatMessage::system(reminder_message(reminder)));
        events.publish(SessionEvent::ReminderFired {
            reminder: reminder.clone(),
        });
    }
    due
}

pub struct ReminderScheduler {
    session: Arc<Mutex<Session>>,
    events: EventBus,
    period: Duration,
    cancel: CancellationToken,
}

impl ReminderScheduler {
    pub fn new(
        session: Arc<Mutex<Session>>,
        events: EventBus,
        period: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            session,
            events,
            period,
            cancel,
        }
    }

    /// Run one scan.
    pub async fn tick(&self) -> Vec<Reminder> {
        let mut session = self.session.lock().await;
        fire_due(&mut session, &self.events, Utc::now())
    }

    /// Run until the cancellation token fires. `notify` is called for each
    /// fired reminder after the session lock is released.
    pub fn spawn<F>(self, notify: F) -> JoinHandle<()>
    where
        F: Fn(&Reminder) + Send + 'static,
    {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = self.cancel.cancelled() => {
                        debug!("reminder scheduler stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        for reminder in self.tick().await {
                            notify(&reminder);
                        }
                    }
                }
            }
        })
    }
}
