//! Ports for the host devices the dispatcher drives.
//!
//! These are synchronous and fire-and-forget: the core never observes
//! whether a dial or a save actually happened on the host.

use nova_types::chat::CapturedImage;

/// A camera that can freeze a frame and resume its live feed.
pub trait VisualCapture: Send + Sync {
    /// Take a still frame as JPEG bytes, or `None` if no frame is available.
    fn capture(&self) -> Option<Vec<u8>>;

    /// Discard the held frame and resume the live feed.
    fn clear(&self);
}

/// Telephony and messaging hand-off to the host.
pub trait Telephony: Send + Sync {
    /// Start a call to a normalized phone number (digits and `+` only).
    fn dial(&self, phone: &str);

    /// Open a messaging conversation with a prefilled message.
    fn open_chat(&self, phone: &str, text: &str);
}

/// Destination for images the user asked to keep.
pub trait ImageSink: Send + Sync {
    fn save(&self, image: &CapturedImage);
}
