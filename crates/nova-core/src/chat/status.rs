//! Raw status flags and the derived `AssistantStatus`.
//!
//! The flags are shared by the turn engine (loading), the speech channel
//! (speaking), and the termination timer (active). Every flip that changes
//! the derived status publishes `StatusChanged`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use nova_types::chat::AssistantStatus;
use nova_types::event::SessionEvent;

use crate::event::bus::EventBus;

#[derive(Debug, Clone, Copy)]
struct Flags {
    active: bool,
    loading: bool,
    speaking: bool,
}

impl Flags {
    fn status(&self) -> AssistantStatus {
        AssistantStatus::derive(self.active, self.loading, self.speaking)
    }
}

#[derive(Debug)]
pub struct StatusFlags {
    flags: Mutex<Flags>,
    events: EventBus,
}

impl StatusFlags {
    pub fn new(events: EventBus) -> Self {
        Self {
            flags: Mutex::new(Flags {
                active: true,
                loading: false,
                speaking: false,
            }),
            events,
        }
    }

    pub fn status(&self) -> AssistantStatus {
        self.lock().status()
    }

    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn is_speaking(&self) -> bool {
        self.lock().speaking
    }

    /// Busy guard. Returns `false`, changing nothing, if a request is
    /// already in flight or the session has ended.
    pub fn try_begin_loading(&self) -> bool {
        let mut flags = self.lock();
        if flags.loading || !flags.active {
            return false;
        }
        self.update(&mut flags, |f| f.loading = true);
        true
    }

    pub fn finish_loading(&self) {
        let mut flags = self.lock();
        self.update(&mut flags, |f| f.loading = false);
    }

    pub fn set_speaking(&self, speaking: bool) {
        let mut flags = self.lock();
        self.update(&mut flags, |f| f.speaking = speaking);
    }

    /// Terminal: a terminated session never becomes active again.
    pub fn terminate(&self) {
        let mut flags = self.lock();
        self.update(&mut flags, |f| f.active = false);
    }

    fn update(&self, flags: &mut MutexGuard<'_, Flags>, change: impl FnOnce(&mut Flags)) {
        let before = flags.status();
        change(&mut **flags);
        let after = flags.status();
        if before != after {
            self.events.publish(SessionEvent::StatusChanged { status: after });
        }
    }

    fn lock(&self) -> MutexGuard<'_, Flags> {
        self.flags.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
