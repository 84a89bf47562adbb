//! GeminiChatService: concrete [`ChatBackend`] for Google Gemini.
//!
//! Talks to the `generateContent` REST endpoint. Plain messages go through a
//! multi-turn conversation primed with the Nova system instruction; visual
//! and grounded queries are one-shot requests.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building request headers.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;

use nova_core::llm::backend::ChatBackend;
use nova_types::chat::CapturedImage;
use nova_types::config::LlmConfig;
use nova_types::llm::{GroundedReply, LlmError};

use super::prompt::{SYSTEM_INSTRUCTION, grounded_prompt, visual_prompt};
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GoogleSearch, Part, Tool,
};

/// Environment variable consulted when the configured one is unset.
const FALLBACK_API_KEY_ENV: &str = "API_KEY";

/// Gemini chat backend.
///
/// Holds the conversation history for `send_message`. Visual and grounded
/// queries never touch it.
pub struct GeminiChatService {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    history: Mutex<Vec<Content>>,
}

// No Debug derive: keeps the key and the conversation out of logs.

impl GeminiChatService {
    pub fn new(api_key: SecretString, model: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model,
            history: Mutex::new(Vec::new()),
        })
    }

    /// Build from configuration, reading the API key from the environment.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = resolve_api_key(&config.api_key_env).ok_or_else(|| {
            LlmError::InvalidRequest(format!(
                "no API key: set {} (or {FALLBACK_API_KEY_ENV})",
                config.api_key_env
            ))
        })?;
        Ok(Self::new(
            api_key,
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )?
        .with_base_url(config.base_url.clone()))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Number of stored conversation turns (user and model).
    pub async fn history_len(&self) -> usize {
        self.history.lock().await.len()
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LlmError> {
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_status(status.as_u16(), error_body));
        }

        response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })
    }
}

impl ChatBackend for GeminiChatService {
    async fn send_message(&self, text: &str) -> Result<String, LlmError> {
        let user_turn = Content::user(vec![Part::text(text)]);
        let mut contents = self.history.lock().await.clone();
        contents.push(user_turn.clone());

        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(Content::instruction(SYSTEM_INSTRUCTION)),
            tools: Vec::new(),
        };
        let reply = self.generate(&request).await?.text().ok_or(LlmError::EmptyResponse)?;

        // Only completed exchanges enter the history.
        let mut history = self.history.lock().await;
        history.push(user_turn);
        history.push(Content::model(reply.clone()));
        tracing::debug!(model = %self.model, turns = history.len(), "chat reply received");
        Ok(reply)
    }

    async fn send_visual_query(
        &self,
        text: &str,
        image: &CapturedImage,
    ) -> Result<String, LlmError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::inline(image.mime_type.clone(), BASE64.encode(&image.bytes)),
                Part::text(visual_prompt(text)),
            ])],
            system_instruction: None,
            tools: Vec::new(),
        };
        self.generate(&request)
            .await?
            .text()
            .ok_or(LlmError::EmptyResponse)
    }

    async fn send_grounded_query(&self, text: &str) -> Result<GroundedReply, LlmError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(grounded_prompt(text))])],
            system_instruction: None,
            tools: vec![Tool {
                google_search: GoogleSearch::default(),
            }],
        };
        let response = self.generate(&request).await?;
        let sources = response.web_sources();
        let text = response.text().ok_or(LlmError::EmptyResponse)?;
        Ok(GroundedReply { text, sources })
    }
}

/// Read the API key from `primary_env`, falling back to `API_KEY`.
pub fn resolve_api_key(primary_env: &str) -> Option<SecretString> {
    [primary_env, FALLBACK_API_KEY_ENV]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .map(SecretString::from)
}

/// Map a non-success HTTP status to an [`LlmError`].
pub fn map_status(status: u16, body: String) -> LlmError {
    match status {
        400 => LlmError::InvalidRequest(body),
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited,
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {body}"),
        },
    }
}
