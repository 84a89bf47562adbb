//! `ChatBackend` trait: the remote language-model service as seen by the
//! turn engine.
//!
//! Three request shapes are consumed. Plain messages go through a stateful
//! conversation that knows the action tag protocol; visual and grounded
//! queries are one-shot. Implemented by nova-infra.

use nova_types::chat::CapturedImage;
use nova_types::llm::{GroundedReply, LlmError};

pub trait ChatBackend: Send + Sync + 'static {
    /// Send a message in the ongoing conversation and return the full reply,
    /// action tag included.
    fn send_message(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;

    /// Ask a question about a camera frame.
    fn send_visual_query(
        &self,
        text: &str,
        image: &CapturedImage,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;

    /// Ask a question answered with web search, returning the cited sources.
    fn send_grounded_query(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<GroundedReply, LlmError>> + Send;
}
