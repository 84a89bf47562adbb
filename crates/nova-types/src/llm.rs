//! Remote chat service types for Nova.
//!
//! The language-model service is consumed as an opaque request/response
//! collaborator. These types carry its grounded replies and its failures.

use serde::{Deserialize, Serialize};

use crate::chat::WebSource;

/// Reply to a search-augmented query, with the pages it was grounded on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundedReply {
    pub text: String,
    pub sources: Vec<WebSource>,
}

/// Errors returned by a chat backend.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited")]
    RateLimited,

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("empty response from model")]
    EmptyResponse,
}
