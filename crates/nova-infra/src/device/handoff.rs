//! [`Telephony`] hand-off through the host URL opener.
//!
//! Calls become `tel:` URLs and chats become WhatsApp links; the opener
//! (`open`, `xdg-open`) decides what handles them. The outcome is logged and
//! otherwise unobserved.

use reqwest::Url;
use tracing::{debug, info, warn};

use nova_core::device::Telephony;
use nova_types::config::HandoffConfig;

#[derive(Debug, Clone)]
pub struct UrlLauncher {
    opener: String,
}

impl UrlLauncher {
    pub fn new(opener: impl Into<String>) -> Self {
        Self {
            opener: opener.into(),
        }
    }

    pub fn from_config(config: &HandoffConfig) -> Self {
        Self::new(config.opener.clone())
    }

    fn launch(&self, url: String) {
        match tokio::process::Command::new(&self.opener).arg(&url).spawn() {
            Ok(mut child) => {
                tokio::spawn(async move {
                    match child.wait().await {
                        Ok(status) if status.success() => debug!("hand-off opened"),
                        Ok(status) => warn!(%status, "hand-off opener failed"),
                        Err(e) => warn!(error = %e, "hand-off opener failed"),
                    }
                });
            }
            Err(e) => warn!(opener = %self.opener, error = %e, "failed to start hand-off opener"),
        }
    }
}

impl Telephony for UrlLauncher {
    fn dial(&self, phone: &str) {
        info!("dialing");
        self.launch(dial_url(phone));
    }

    fn open_chat(&self, phone: &str, text: &str) {
        match chat_url(phone, text) {
            Some(url) => {
                info!("opening chat");
                self.launch(url);
            }
            None => warn!("could not build chat URL"),
        }
    }
}

pub fn dial_url(phone: &str) -> String {
    format!("tel:{phone}")
}

/// `https://wa.me/<digits>?text=<encoded message>`
pub fn chat_url(phone: &str, text: &str) -> Option<String> {
    let digits = phone.trim_start_matches('+');
    let mut url = Url::parse("https://wa.me/").ok()?.join(digits).ok()?;
    url.query_pairs_mut().append_pair("text", text);
    Some(url.into())
}
