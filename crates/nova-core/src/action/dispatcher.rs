//! Action dispatcher: executes one parsed action against session state.
//!
//! Each dispatch is a transition over the memory store, the directory, and
//! the held photo. It returns the status line for the log plus the effects
//! the engine must carry out afterwards (persisting memory, hand-offs, UI
//! signals, termination). Nothing here awaits.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use nova_types::action::{ActionKind, ParsedAction};
use nova_types::chat::CapturedImage;
use nova_types::directory::Contact;
use nova_types::error::DirectoryError;
use tracing::{debug, info};

use crate::action::parser::parse_leading_int;
use crate::device::VisualCapture;
use crate::directory::Directory;
use crate::memory::store::MemoryStore;

/// The slice of session state an action may mutate.
pub struct ActionState<'a> {
    pub memory: &'a mut MemoryStore,
    pub directory: &'a mut Directory,
    pub photo: &'a mut Option<CapturedImage>,
}

/// Work left for the engine once the state transition is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEffect {
    PhotoCaptured,
    PhotoCleared,
    ShowContacts(Vec<Contact>),
    SaveImage(CapturedImage),
    PersistMemory,
    Dial { phone: String },
    OpenChat { phone: String, text: String },
    TerminateSession,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    /// System message for the log. `None` for silent actions.
    pub status: Option<String>,
    pub effects: Vec<ActionEffect>,
}

impl ActionOutcome {
    fn status(text: impl Into<String>) -> Self {
        Self {
            status: Some(text.into()),
            effects: Vec::new(),
        }
    }

    fn with(mut self, effect: ActionEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

pub struct ActionDispatcher {
    camera: Option<Arc<dyn VisualCapture>>,
}

impl ActionDispatcher {
    pub fn new(camera: Option<Arc<dyn VisualCapture>>) -> Self {
        Self { camera }
    }

    pub fn dispatch(
        &self,
        action: &ParsedAction,
        state: ActionState<'_>,
        now: DateTime<Utc>,
    ) -> ActionOutcome {
        let Some(kind) = action.kind() else {
            debug!(action = %action.name, "ignoring unknown action");
            return ActionOutcome::default();
        };
        info!(action = %kind, params = action.params.len(), "dispatching action");

        let params = &action.params;
        match kind {
            ActionKind::CapturePhoto => self.capture_photo(state.photo, now),
            ActionKind::ClearPhoto => self.clear_photo(state.photo),
            ActionKind::SavePhoto => match state.photo {
                Some(image) => ActionOutcome::status("Acknowledged. Saving the captured image.")
                    .with(ActionEffect::SaveImage(image.clone())),
                None => ActionOutcome::status(
                    "Action failed: No visual input has been captured. Please capture a photo before saving.",
                ),
            },
            ActionKind::SetReminder => {
                let due_in = params.get("dueInSeconds").and_then(parse_leading_int);
                match (params.get("message"), due_in) {
                    (Some(message), Some(secs)) => {
                        match state.directory.add_reminder(message, secs, now) {
                            Ok(_) => ActionOutcome::status(format!("Reminder set: \"{message}\"")),
                            Err(_) => ActionOutcome::status("Error: Could not set reminder."),
                        }
                    }
                    _ => ActionOutcome::status("Error: Could not set reminder."),
                }
            }
            ActionKind::AddContact => match (params.get("name"), params.get("phone")) {
                (Some(name), Some(phone)) => match state.directory.add_contact(name, phone, now) {
                    Ok(_) => ActionOutcome::status(format!("Contact '{name}' added successfully.")),
                    Err(DirectoryError::ContactExists(_)) => ActionOutcome::status(format!(
                        "Error: A contact named '{name}' already exists."
                    )),
                    Err(_) => ActionOutcome::status("Error: Could not add contact."),
                },
                _ => ActionOutcome::status("Error: Could not add contact."),
            },
            ActionKind::DeleteContact => match params.get("name") {
                Some(name) => match state.directory.delete_contact(name) {
                    Ok(_) => ActionOutcome::status(format!("Contact '{name}' has been removed.")),
                    Err(_) => ActionOutcome::status(format!("Error: Contact '{name}' not found.")),
                },
                None => ActionOutcome::status("Error: Contact name not provided."),
            },
            ActionKind::ViewContacts => ActionOutcome::status("Displaying all saved contacts.")
                .with(ActionEffect::ShowContacts(state.directory.contacts().to_vec())),
            ActionKind::Remember => match (params.get("key"), params.get("value")) {
                (Some(key), Some(value)) => {
                    state.memory.remember(key, value);
                    ActionOutcome::status(format!(
                        "Memory updated. I will remember that your {key} is {value}."
                    ))
                    .with(ActionEffect::PersistMemory)
                }
                _ => ActionOutcome::status("Error: Could not update memory."),
            },
            ActionKind::Forget => match params.get("key") {
                Some(key) if state.memory.forget(key) => ActionOutcome::status(format!(
                    "Acknowledged. I have forgotten the information about '{key}'."
                ))
                .with(ActionEffect::PersistMemory),
                Some(key) => {
                    ActionOutcome::status(format!("Error: No information found for '{key}'."))
                }
                None => ActionOutcome::status("Error: Key not provided."),
            },
            ActionKind::ViewMemory => ActionOutcome::status(format_memory(state.memory)),
            ActionKind::CallContact | ActionKind::SendWhatsapp => {
                let recipient = params.get("recipient").unwrap_or_default();
                let Some(phone) = resolve_recipient(state.directory, recipient) else {
                    return ActionOutcome::status(format!(
                        "Recipient '{recipient}' not found or invalid."
                    ));
                };
                if kind == ActionKind::CallContact {
                    ActionOutcome::status(format!("Initiating call to {recipient}..."))
                        .with(ActionEffect::Dial { phone })
                } else {
                    let text = params.get("message").unwrap_or_default().to_string();
                    ActionOutcome::status("Opening WhatsApp... Please confirm and send the message.")
                        .with(ActionEffect::OpenChat { phone, text })
                }
            }
            ActionKind::OpenApp => {
                let app = action.raw_params.trim();
                if app.eq_ignore_ascii_case("nova") {
                    ActionOutcome::status("Acknowledged: This is the Nova Personal Assistant interface.")
                } else {
                    ActionOutcome::status(format!("Simulating: open_app('{app}')..."))
                }
            }
            ActionKind::CloseApp => {
                let app = action.raw_params.trim();
                if app.eq_ignore_ascii_case("nova") {
                    ActionOutcome::status("Acknowledged. Terminating Nova session.")
                        .with(ActionEffect::TerminateSession)
                } else {
                    ActionOutcome::status(format!("Executing: close_app('{app}')..."))
                }
            }
        }
    }

    fn capture_photo(
        &self,
        photo: &mut Option<CapturedImage>,
        now: DateTime<Utc>,
    ) -> ActionOutcome {
        let Some(camera) = &self.camera else {
            return ActionOutcome::status("Error: Visual input component not available.");
        };
        match camera.capture() {
            Some(bytes) => {
                let mut image = CapturedImage::jpeg(bytes);
                image.captured_at = now;
                *photo = Some(image);
                ActionOutcome::status("Visual input captured.").with(ActionEffect::PhotoCaptured)
            }
            None => ActionOutcome::status("Error: Could not capture visual input."),
        }
    }

    /// Silent when there is no camera to clear.
    fn clear_photo(&self, photo: &mut Option<CapturedImage>) -> ActionOutcome {
        let Some(camera) = &self.camera else {
            return ActionOutcome::default();
        };
        camera.clear();
        *photo = None;
        ActionOutcome::status("Visual input cleared. Resuming live feed.")
            .with(ActionEffect::PhotoCleared)
    }
}

/// Contact name first (ignoring case), then the recipient itself if it
/// looks like a phone number. Spaces and dashes are stripped.
pub fn resolve_recipient(directory: &Directory, recipient: &str) -> Option<String> {
    let raw = match directory.find_contact(recipient) {
        Some(contact) => contact.phone.as_str(),
        None if is_phone_number(recipient) => recipient,
        None => return None,
    };
    let phone: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    (!phone.is_empty()).then_some(phone)
}

/// At least one digit, and nothing but digits, whitespace, `+` and `-`.
pub fn is_phone_number(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
        && s
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || c == '+' || c == '-')
}

pub fn format_memory(memory: &MemoryStore) -> String {
    if memory.is_empty() {
        return "My memory banks are currently empty.".to_string();
    }
    let lines: Vec<String> = memory
        .entries()
        .map(|(key, value)| format!("• {key}: {value}"))
        .collect();
    format!("Recalling all stored information:\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::parser::parse_reply;
    use std::sync::Mutex;

    struct FakeCamera {
        frame: Option<Vec<u8>>,
        cleared: Mutex<u32>,
    }

    impl FakeCamera {
        fn with_frame() -> Arc<Self> {
            Arc::new(Self {
                frame: Some(vec![0xFF, 0xD8, 0xFF]),
                cleared: Mutex::new(0),
            })
        }
    }

    impl VisualCapture for FakeCamera {
        fn capture(&self) -> Option<Vec<u8>> {
            self.frame.clone()
        }

        fn clear(&self) {
            *self.cleared.lock().unwrap() += 1;
        }
    }

    #[derive(Default)]
    struct State {
        memory: MemoryStore,
        directory: Directory,
        photo: Option<CapturedImage>,
    }

    impl State {
        fn run(&mut self, dispatcher: &ActionDispatcher, reply: &str) -> ActionOutcome {
            let action = parse_reply(reply).action.expect("reply carries a tag");
            dispatcher.dispatch(
                &action,
                ActionState {
                    memory: &mut self.memory,
                    directory: &mut self.directory,
                    photo: &mut self.photo,
                },
                Utc::now(),
            )
        }
    }

    fn no_camera() -> ActionDispatcher {
        ActionDispatcher::new(None)
    }

    fn status(outcome: &ActionOutcome) -> &str {
        outcome.status.as_deref().unwrap_or_default()
    }

    #[test]
    fn test_remember_then_forget() {
        let mut state = State::default();
        let d = no_camera();

        let out = state.run(&d, "[ACTION:remember:key=favorite color|value=blue]");
        assert_eq!(
            status(&out),
            "Memory updated. I will remember that your favorite color is blue."
        );
        assert_eq!(out.effects, vec![ActionEffect::PersistMemory]);
        assert_eq!(state.memory.recall("Favorite Color"), Some(("favorite color", "blue")));

        let out = state.run(&d, "[ACTION:forget:key=FAVORITE COLOR]");
        assert_eq!(
            status(&out),
            "Acknowledged. I have forgotten the information about 'FAVORITE COLOR'."
        );
        assert!(state.memory.recall("favorite color").is_none());

        let out = state.run(&d, "[ACTION:forget:key=favorite color]");
        assert_eq!(status(&out), "Error: No information found for 'favorite color'.");
        assert!(out.effects.is_empty());
    }

    #[test]
    fn test_remember_missing_value() {
        let mut state = State::default();
        let out = state.run(&no_camera(), "[ACTION:remember:key=color]");
        assert_eq!(status(&out), "Error: Could not update memory.");
        assert!(state.memory.is_empty());
    }

    #[test]
    fn test_forget_without_key() {
        let mut state = State::default();
        let out = state.run(&no_camera(), "[ACTION:forget]");
        assert_eq!(status(&out), "Error: Key not provided.");
    }

    #[test]
    fn test_view_memory() {
        let mut state = State::default();
        let d = no_camera();
        assert_eq!(
            status(&state.run(&d, "[ACTION:view_memory]")),
            "My memory banks are currently empty."
        );

        state.memory.remember("dog", "Rex");
        state.memory.remember("city", "Oslo");
        assert_eq!(
            status(&state.run(&d, "[ACTION:view_memory]")),
            "Recalling all stored information:\n• dog: Rex\n• city: Oslo"
        );
    }

    #[test]
    fn test_set_reminder() {
        let mut state = State::default();
        let d = no_camera();

        let out = state.run(&d, "[ACTION:set_reminder:dueInSeconds=30|message=stretch]");
        assert_eq!(status(&out), "Reminder set: \"stretch\"");
        assert_eq!(state.directory.reminders().len(), 1);

        for bad in [
            "[ACTION:set_reminder:dueInSeconds=soon|message=stretch]",
            "[ACTION:set_reminder:dueInSeconds=30]",
            "[ACTION:set_reminder:dueInSeconds=0|message=now]",
        ] {
            assert_eq!(status(&state.run(&d, bad)), "Error: Could not set reminder.", "{bad}");
        }
        assert_eq!(state.directory.reminders().len(), 1);
    }

    #[test]
    fn test_set_reminder_with_huge_delay_reports_error() {
        let mut state = State::default();
        let d = no_camera();

        for huge in [
            "[ACTION:set_reminder:dueInSeconds=99999999999999999|message=x]",
            "[ACTION:set_reminder:dueInSeconds=9000000000000|message=x]",
        ] {
            assert_eq!(status(&state.run(&d, huge)), "Error: Could not set reminder.", "{huge}");
        }
        assert!(state.directory.reminders().is_empty());
    }

    #[test]
    fn test_contacts_lifecycle() {
        let mut state = State::default();
        let d = no_camera();

        let out = state.run(&d, "[ACTION:add_contact:name=Alice|phone=555 0100]");
        assert_eq!(status(&out), "Contact 'Alice' added successfully.");

        let out = state.run(&d, "[ACTION:add_contact:name=alice|phone=555 0199]");
        assert_eq!(status(&out), "Error: A contact named 'alice' already exists.");

        let out = state.run(&d, "[ACTION:add_contact:name=Bob]");
        assert_eq!(status(&out), "Error: Could not add contact.");

        let out = state.run(&d, "[ACTION:view_contacts]");
        assert_eq!(status(&out), "Displaying all saved contacts.");
        assert!(matches!(&out.effects[..], [ActionEffect::ShowContacts(c)] if c.len() == 1));

        let out = state.run(&d, "[ACTION:delete_contact:name=Carol]");
        assert_eq!(status(&out), "Error: Contact 'Carol' not found.");
        assert_eq!(state.directory.contacts().len(), 1);

        let out = state.run(&d, "[ACTION:delete_contact:name=ALICE]");
        assert_eq!(status(&out), "Contact 'ALICE' has been removed.");
        assert!(state.directory.contacts().is_empty());

        let out = state.run(&d, "[ACTION:delete_contact]");
        assert_eq!(status(&out), "Error: Contact name not provided.");
    }

    #[test]
    fn test_call_contact_by_name_and_number() {
        let mut state = State::default();
        let d = no_camera();
        state.directory.add_contact("Alice", "+1 555-0100", Utc::now()).unwrap();

        let out = state.run(&d, "[ACTION:call_contact:recipient=alice]");
        assert_eq!(status(&out), "Initiating call to alice...");
        assert_eq!(
            out.effects,
            vec![ActionEffect::Dial {
                phone: "+15550100".to_string()
            }]
        );

        let out = state.run(&d, "[ACTION:call_contact:recipient=555-123-4567]");
        assert_eq!(
            out.effects,
            vec![ActionEffect::Dial {
                phone: "5551234567".to_string()
            }]
        );

        let out = state.run(&d, "[ACTION:call_contact:recipient=Bob]");
        assert_eq!(status(&out), "Recipient 'Bob' not found or invalid.");
        assert!(out.effects.is_empty());
    }

    #[test]
    fn test_send_whatsapp() {
        let mut state = State::default();
        let out = state.run(
            &no_camera(),
            "[ACTION:send_whatsapp:recipient=555 123 4567|message=running late]",
        );
        assert_eq!(
            status(&out),
            "Opening WhatsApp... Please confirm and send the message."
        );
        assert_eq!(
            out.effects,
            vec![ActionEffect::OpenChat {
                phone: "5551234567".to_string(),
                text: "running late".to_string(),
            }]
        );
    }

    #[test]
    fn test_phone_pattern() {
        assert!(is_phone_number("555-123-4567"));
        assert!(is_phone_number("+44 20 7946 0958"));
        assert!(!is_phone_number("+ -"));
        assert!(!is_phone_number("Bob"));
        assert!(!is_phone_number("555 call me"));
        assert!(!is_phone_number(""));
    }

    #[test]
    fn test_photo_without_camera() {
        let mut state = State::default();
        let d = no_camera();
        assert_eq!(
            status(&state.run(&d, "[ACTION:capture_photo]")),
            "Error: Visual input component not available."
        );
        assert_eq!(state.run(&d, "[ACTION:clear_photo]"), ActionOutcome::default());
        assert_eq!(
            status(&state.run(&d, "[ACTION:save_photo]")),
            "Action failed: No visual input has been captured. Please capture a photo before saving."
        );
    }

    #[test]
    fn test_capture_save_clear() {
        let camera = FakeCamera::with_frame();
        let d = ActionDispatcher::new(Some(camera.clone()));
        let mut state = State::default();

        let out = state.run(&d, "[ACTION:capture_photo]");
        assert_eq!(status(&out), "Visual input captured.");
        assert_eq!(out.effects, vec![ActionEffect::PhotoCaptured]);
        assert!(state.photo.is_some());

        let out = state.run(&d, "[ACTION:save_photo]");
        assert_eq!(status(&out), "Acknowledged. Saving the captured image.");
        assert!(matches!(&out.effects[..], [ActionEffect::SaveImage(img)] if img.bytes.len() == 3));

        let out = state.run(&d, "[ACTION:clear_photo]");
        assert_eq!(status(&out), "Visual input cleared. Resuming live feed.");
        assert!(state.photo.is_none());
        assert_eq!(*camera.cleared.lock().unwrap(), 1);
    }

    #[test]
    fn test_capture_failure() {
        let camera = Arc::new(FakeCamera {
            frame: None,
            cleared: Mutex::new(0),
        });
        let d = ActionDispatcher::new(Some(camera));
        let mut state = State::default();
        let out = state.run(&d, "[ACTION:capture_photo]");
        assert_eq!(status(&out), "Error: Could not capture visual input.");
        assert!(state.photo.is_none());
    }

    #[test]
    fn test_open_and_close_app() {
        let mut state = State::default();
        let d = no_camera();
        assert_eq!(
            status(&state.run(&d, "[ACTION:open_app:Nova]")),
            "Acknowledged: This is the Nova Personal Assistant interface."
        );
        assert_eq!(
            status(&state.run(&d, "[ACTION:open_app:maps]")),
            "Simulating: open_app('maps')..."
        );
        assert_eq!(
            status(&state.run(&d, "[ACTION:close_app:maps]")),
            "Executing: close_app('maps')..."
        );

        let out = state.run(&d, "[ACTION:close_app:nova]");
        assert_eq!(status(&out), "Acknowledged. Terminating Nova session.");
        assert_eq!(out.effects, vec![ActionEffect::TerminateSession]);
    }

    #[test]
    fn test_unknown_action_is_silent() {
        let mut state = State::default();
        let out = state.run(&no_camera(), "[ACTION:launch_rocket:target=moon]");
        assert_eq!(out, ActionOutcome::default());
    }
}
