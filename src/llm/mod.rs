// ABOUTME: LLM provider abstraction for the recipe chat assistant
// ABOUTME: Multimodal chat messages, sampling parameters, and the provider contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Interface
//!
//! The chat assistant talks to a hosted chat-completion endpoint. This module
//! defines the contract such a provider implements plus the message types it
//! exchanges.
//!
//! ## Key Concepts
//!
//! - **`LlmCapabilities`**: Bitflags describing provider features (vision, system messages)
//! - **`LlmProvider`**: Async trait for a single chat completion
//! - **`ChatMessage`**: Role-based message made of typed content parts
//! - **`ChatRequest`**: Messages plus sampling parameters
//!
//! ## Example
//!
//! ```rust,no_run
//! use cook_ai::llm::{ChatMessage, ChatRequest, LlmProvider};
//!
//! async fn ask(provider: &dyn LlmProvider) {
//!     let messages = vec![
//!         ChatMessage::system("You suggest recipes."),
//!         ChatMessage::user("What can I cook with eggs and spinach?"),
//!     ];
//!
//!     let request = ChatRequest::new(messages).with_temperature(0.7);
//!     let _reply = provider.complete(&request).await;
//! }
//! ```

mod openai_compatible;
pub mod prompts;

pub use openai_compatible::{ApiKeyStyle, OpenAiCompatibleConfig, OpenAiCompatibleProvider};
pub use prompts::get_recipe_assistant_prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

// ============================================================================
// Capability Flags
// ============================================================================

bitflags::bitflags! {
    /// LLM provider capability flags
    ///
    /// Checked before a request is built so unsupported inputs fail early.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct LlmCapabilities: u8 {
        /// Provider accepts image content parts
        const VISION = 1;
        /// Provider honours a leading system message
        const SYSTEM_MESSAGES = 1 << 1;
    }
}

impl LlmCapabilities {
    /// Capabilities of a text-only provider
    #[must_use]
    pub const fn text_only() -> Self {
        Self::SYSTEM_MESSAGES
    }

    /// Capabilities of a vision-capable chat model
    #[must_use]
    pub const fn multimodal() -> Self {
        Self::VISION.union(Self::SYSTEM_MESSAGES)
    }

    /// Whether image parts may be sent
    #[must_use]
    pub const fn supports_vision(&self) -> bool {
        self.contains(Self::VISION)
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Who authored a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instructions for the assistant
    System,
    /// User input message
    User,
    /// Model reply
    Assistant,
}

impl MessageRole {
    /// Wire name of the role
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Inline image reference carried by an `image_url` part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    /// `data:` URL or remote URL
    pub url: String,
}

/// Typed piece of message content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text
    Text {
        /// Text body
        text: String,
    },
    /// Image supplied by URL
    ImageUrl {
        /// Image location
        image_url: ImageUrl,
    },
}

impl ContentPart {
    /// Text part
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Image part from a URL
    #[must_use]
    pub fn image_url(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }

    /// Whether this part is an image
    #[must_use]
    pub const fn is_image(&self) -> bool {
        matches!(self, Self::ImageUrl { .. })
    }
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author of the turn
    pub role: MessageRole,
    /// Ordered content parts
    pub content: Vec<ContentPart>,
}

impl ChatMessage {
    /// Create a message from parts
    #[must_use]
    pub const fn new(role: MessageRole, content: Vec<ContentPart>) -> Self {
        Self { role, content }
    }

    /// System turn with a single text part
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(MessageRole::System, vec![ContentPart::text(text)])
    }

    /// Create a text-only user message
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, vec![ContentPart::text(text)])
    }

    /// Assistant turn with a single text part
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, vec![ContentPart::text(text)])
    }

    /// Concatenated text parts
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::ImageUrl { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether any part is an image
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.content.iter().any(ContentPart::is_image)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Conversation plus sampling knobs sent to a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Model name, or the provider default when unset
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Nucleus sampling mass
    pub top_p: Option<f32>,
    /// Reply length cap in tokens
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Request with provider-default sampling
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            top_p: None,
            max_tokens: None,
        }
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set `top_p`
    #[must_use]
    pub const fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set the maximum tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Whether any message carries an image
    #[must_use]
    pub fn has_images(&self) -> bool {
        self.messages.iter().any(ChatMessage::has_image)
    }
}

/// Provider reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Reply text
    pub content: String,
    /// Model that produced the reply
    pub model: String,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
    /// Why generation stopped, as reported by the provider
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Reply tokens
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

// ============================================================================
// Provider Trait
// ============================================================================

/// A hosted chat-completion endpoint
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "azure-openai", "openai")
    fn name(&self) -> &'static str;

    /// Provider capabilities
    fn capabilities(&self) -> LlmCapabilities;

    /// Default model, if the endpoint needs one in the request body
    fn default_model(&self) -> Option<&str>;

    /// Perform a chat completion
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;
}
