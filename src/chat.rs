// ABOUTME: Recipe assistant conversation with ordered history and optional photo attachments
// ABOUTME: Failed completions become a synthetic assistant reply so the chat stays usable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Chat Session
//!
//! The assistant sees the system prompt followed by the whole conversation on
//! every turn. A user turn is made of an optional photo (sent inline as a
//! base64 `data:` URL) followed by optional text.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cook_ai::chat::ChatSession;
//! use cook_ai::llm::LlmProvider;
//!
//! async fn example(provider: Arc<dyn LlmProvider>) {
//!     let mut chat = ChatSession::new(provider);
//!     if let Some(reply) = chat.send("What can I make with leeks?", None).await {
//!         println!("{}", reply.text());
//!     }
//! }
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::fs;
use tracing::{debug, warn};

use crate::config::ChatConfig;
use crate::constants::chat::{
    DEFAULT_IMAGE_MIME, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, FAILURE_REPLY,
};
use crate::errors::{AppError, AppResult};
use crate::llm::{
    get_recipe_assistant_prompt, ChatMessage, ChatRequest, ContentPart, LlmProvider, MessageRole,
};
use crate::logging::AppLogger;

/// Photo attached to a user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    mime_type: String,
    bytes: Vec<u8>,
}

impl ImageAttachment {
    /// Attachment from raw bytes
    #[must_use]
    pub fn from_bytes(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read an image file, guessing the MIME type from its extension
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be read, or `InvalidInput`
    /// if it is empty.
    pub async fn from_path(path: &Path) -> AppResult<Self> {
        let bytes = fs::read(path).await.map_err(|e| {
            AppError::storage(format!("Cannot read image {}: {e}", path.display())).with_source(e)
        })?;
        if bytes.is_empty() {
            return Err(AppError::invalid_input(format!(
                "Image {} is empty",
                path.display()
            )));
        }
        Ok(Self::from_bytes(mime_for(path), bytes))
    }

    /// MIME type
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Inline `data:` URL
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => DEFAULT_IMAGE_MIME,
    }
}

/// Sampling parameters sent with every turn
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    /// Model name, for endpoints that need one in the body
    pub model: Option<String>,
    /// Temperature
    pub temperature: f32,
    /// Nucleus sampling mass
    pub top_p: f32,
    /// Completion token cap
    pub max_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl From<&ChatConfig> for SamplingParams {
    fn from(config: &ChatConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
        }
    }
}

/// One conversation with the recipe assistant
pub struct ChatSession {
    provider: Arc<dyn LlmProvider>,
    system_prompt: String,
    sampling: SamplingParams,
    history: Vec<ChatMessage>,
}

impl ChatSession {
    /// Empty conversation using the built-in recipe prompt and default sampling
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            system_prompt: get_recipe_assistant_prompt().to_owned(),
            sampling: SamplingParams::default(),
            history: Vec::new(),
        }
    }

    /// Replace the sampling parameters
    #[must_use]
    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    /// Replace the system prompt
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Conversation so far, oldest first, without the system prompt
    #[must_use]
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Forget the conversation
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Send a user turn and append the assistant's reply
    ///
    /// Does nothing and returns `None` when the text is blank and no image is
    /// attached. Otherwise returns the appended assistant message, which is
    /// the fixed failure reply if the completion failed.
    pub async fn send(&mut self, text: &str, image: Option<ImageAttachment>) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() && image.is_none() {
            return None;
        }

        let with_image = image.is_some();
        let mut parts = Vec::with_capacity(2);
        if let Some(image) = image {
            parts.push(ContentPart::image_url(image.data_url()));
        }
        if !text.is_empty() {
            parts.push(ContentPart::text(text));
        }
        self.history.push(ChatMessage::new(MessageRole::User, parts));

        let reply = match self.complete(with_image).await {
            Ok(content) => content,
            Err(e) => {
                warn!(provider = self.provider.name(), "Chat completion failed: {e}");
                FAILURE_REPLY.to_owned()
            }
        };
        self.history.push(ChatMessage::assistant(reply));
        self.history.last()
    }

    async fn complete(&self, with_image: bool) -> AppResult<String> {
        if with_image && !self.provider.capabilities().supports_vision() {
            return Err(AppError::invalid_input(format!(
                "{} does not accept images",
                self.provider.name()
            )));
        }

        let mut messages = Vec::with_capacity(self.history.len() + 1);
        messages.push(ChatMessage::system(self.system_prompt.as_str()));
        messages.extend(self.history.iter().cloned());

        let mut request = ChatRequest::new(messages)
            .with_temperature(self.sampling.temperature)
            .with_top_p(self.sampling.top_p)
            .with_max_tokens(self.sampling.max_tokens);
        if let Some(model) = self
            .sampling
            .model
            .as_deref()
            .or_else(|| self.provider.default_model())
        {
            request = request.with_model(model);
        }

        debug!(turns = self.history.len(), with_image, "Sending chat turn");
        let started = Instant::now();
        let result = self.provider.complete(&request).await;
        AppLogger::log_chat_call(
            self.provider.name(),
            with_image,
            result.is_ok(),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );
        Ok(result?.content.trim().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_is_base64_inline() {
        let image = ImageAttachment::from_bytes("image/png", vec![0x89, b'P', b'N', b'G']);
        assert_eq!(image.data_url(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_mime_guess_defaults_to_jpeg() {
        assert_eq!(mime_for(Path::new("dinner.PNG")), "image/png");
        assert_eq!(mime_for(Path::new("fridge")), "image/jpeg");
        assert_eq!(mime_for(Path::new("fridge.jpg")), "image/jpeg");
    }
}
