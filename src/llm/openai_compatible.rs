// ABOUTME: OpenAI-compatible chat-completion provider for hosted multimodal models
// ABOUTME: Supports Azure-style api-key headers and standard bearer authentication
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! Sends chat requests to any endpoint implementing the `OpenAI` chat
//! completions API with typed content parts. Azure `OpenAI` deployments encode
//! the model in the URL and authenticate with an `api-key` header; `OpenAI` and
//! most gateways take a model name in the body and a bearer token.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cook_ai::llm::{
//!     ApiKeyStyle, ChatMessage, ChatRequest, LlmProvider, OpenAiCompatibleConfig,
//!     OpenAiCompatibleProvider,
//! };
//! use cook_ai::errors::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = OpenAiCompatibleConfig::openai("sk-...", "gpt-4o-mini");
//!     let provider = OpenAiCompatibleProvider::new(config)?;
//!     let request = ChatRequest::new(vec![ChatMessage::user("Suggest a soup")]);
//!     let response = provider.complete(&request).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{
    ChatMessage, ChatRequest, ChatResponse, ContentPart, LlmCapabilities, LlmProvider, TokenUsage,
};
use crate::constants::service_names::CHAT_ENDPOINT;
use crate::errors::{AppError, ErrorCode};

// ============================================================================
// Configuration Constants
// ============================================================================

/// Default `OpenAI` API base
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Path suffix of the chat completions operation
const COMPLETIONS_PATH: &str = "chat/completions";

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 15;

/// Request timeout (image prompts can be slow)
const REQUEST_TIMEOUT_SECS: u64 = 120;

// ============================================================================
// Wire Types
// ============================================================================

/// Body of a `chat/completions` call
#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Successful `chat/completions` reply
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    model: String,
}

/// One candidate reply
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

/// Reply message; `content` is null for refusals on some gateways
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

/// Token accounting
#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// How the API key is presented to the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiKeyStyle {
    /// `api-key: <key>` header (Azure `OpenAI`)
    #[default]
    ApiKeyHeader,
    /// `Authorization: Bearer <key>`
    Bearer,
}

impl ApiKeyStyle {
    /// Parse the `CHAT_AUTH_STYLE` value
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "api-key" | "apikey" | "azure" => Some(Self::ApiKeyHeader),
            "bearer" => Some(Self::Bearer),
            _ => None,
        }
    }
}

/// Endpoint, credentials, and model of a chat deployment
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Endpoint URL, either an API base or the full completions URL
    pub endpoint: String,
    /// API key (optional for local gateways)
    pub api_key: Option<String>,
    /// Header style for the API key
    pub key_style: ApiKeyStyle,
    /// Model sent in the body; `None` for deployment-scoped endpoints
    pub default_model: Option<String>,
    /// Provider name for logging
    pub provider_name: &'static str,
    /// Capabilities of the deployed model
    pub capabilities: LlmCapabilities,
}

impl OpenAiCompatibleConfig {
    /// Configuration for an Azure `OpenAI` deployment
    ///
    /// `endpoint` is the full deployment URL including `api-version`.
    #[must_use]
    pub fn azure(endpoint: &str, api_key: &str) -> Self {
        Self {
            endpoint: endpoint.to_owned(),
            api_key: Some(api_key.to_owned()),
            key_style: ApiKeyStyle::ApiKeyHeader,
            default_model: None,
            provider_name: "azure-openai",
            capabilities: LlmCapabilities::multimodal(),
        }
    }

    /// Configuration for the public `OpenAI` API
    #[must_use]
    pub fn openai(api_key: &str, model: &str) -> Self {
        Self {
            endpoint: OPENAI_BASE_URL.to_owned(),
            api_key: Some(api_key.to_owned()),
            key_style: ApiKeyStyle::Bearer,
            default_model: Some(model.to_owned()),
            provider_name: "openai",
            capabilities: LlmCapabilities::multimodal(),
        }
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible chat provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Build the provider and its HTTP client
    ///
    /// # Errors
    ///
    /// Returns an internal error if the TLS backend cannot be initialized.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Cannot build chat HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Full URL of the completions operation
    ///
    /// Endpoints that already point at `chat/completions` (Azure deployment
    /// URLs carry an `api-version` query) are used as-is.
    fn api_url(&self) -> String {
        let endpoint = self.config.endpoint.trim_end_matches('/');
        let path = endpoint.split('?').next().unwrap_or(endpoint);
        if path.ends_with(COMPLETIONS_PATH) {
            endpoint.to_owned()
        } else {
            format!("{endpoint}/{COMPLETIONS_PATH}")
        }
    }

    /// Attach the API key in the configured style
    fn with_credentials(&self, request: RequestBuilder) -> RequestBuilder {
        match (&self.config.api_key, self.config.key_style) {
            (Some(key), ApiKeyStyle::ApiKeyHeader) => request.header("api-key", key),
            (Some(key), ApiKeyStyle::Bearer) => request.bearer_auth(key),
            (None, _) => request,
        }
    }

    /// Log message shapes without their payloads
    fn trace_shapes(messages: &[ChatMessage], provider_name: &str) {
        for (index, message) in messages.iter().enumerate() {
            let images = message.content.iter().filter(|p| p.is_image()).count();
            let text_len: usize = message
                .content
                .iter()
                .map(|p| match p {
                    ContentPart::Text { text } => text.len(),
                    ContentPart::ImageUrl { .. } => 0,
                })
                .sum();
            debug!(
                index,
                role = message.role.as_str(),
                parts = message.content.len(),
                images,
                text_len,
                "Outgoing chat turn"
            );
        }
        debug!(provider = provider_name, turns = messages.len(), "Sending chat completion");
    }

    /// Map a non-2xx reply to an application error
    fn error_from_status(status: StatusCode, body: &str) -> AppError {
        if let Ok(envelope) = serde_json::from_str::<OpenAiErrorResponse>(body) {
            let message = envelope.error.message;
            match status.as_u16() {
                401 | 403 => {
                    AppError::auth_invalid(format!("API authentication failed: {message}"))
                }
                429 => AppError::new(ErrorCode::ExternalRateLimited, message),
                400 => AppError::invalid_input(format!("API validation error: {message}")),
                404 => AppError::not_found(format!("Model or deployment ({message})")),
                _ => AppError::external_service(
                    CHAT_ENDPOINT,
                    format!(
                        "{} - {message}",
                        envelope.error.kind.as_deref().unwrap_or("unknown")
                    ),
                ),
            }
        } else {
            let snippet: String = body.chars().take(200).collect();
            if matches!(status.as_u16(), 502..=504) {
                AppError::external_unavailable(
                    CHAT_ENDPOINT,
                    format!("Chat endpoint is not responding ({status})"),
                )
            } else {
                AppError::external_service(CHAT_ENDPOINT, format!("HTTP {status}: {snippet}"))
            }
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        self.config.provider_name
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.config.capabilities
    }

    fn default_model(&self) -> Option<&str> {
        self.config.default_model.as_deref()
    }

    #[instrument(skip(self, request), fields(provider = self.config.provider_name, messages = request.messages.len()))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        if request.has_images() && !self.config.capabilities.supports_vision() {
            return Err(AppError::invalid_input(format!(
                "{} does not accept image input",
                self.config.provider_name
            )));
        }

        Self::trace_shapes(&request.messages, self.config.provider_name);

        let body = OpenAiRequest {
            model: request.model.as_deref().or(self.default_model()),
            messages: &request.messages,
            temperature: request.temperature,
            top_p: request.top_p,
            max_tokens: request.max_tokens,
        };

        let response = self
            .with_credentials(self.client.post(self.api_url()).json(&body))
            .send()
            .await
            .inspect_err(|e| {
                error!(provider = self.config.provider_name, "Chat request failed: {e}");
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            AppError::external_service(CHAT_ENDPOINT, format!("Cannot read reply body: {e}"))
        })?;
        if !status.is_success() {
            return Err(Self::error_from_status(status, &text));
        }

        let reply: OpenAiResponse = serde_json::from_str(&text).map_err(|e| {
            let snippet: String = text.chars().take(500).collect();
            error!(provider = self.config.provider_name, "Unexpected reply shape: {e}: {snippet}");
            AppError::external_service(CHAT_ENDPOINT, format!("Unexpected reply shape: {e}"))
        })?;

        let Some(choice) = reply.choices.into_iter().next() else {
            return Err(AppError::external_service(CHAT_ENDPOINT, "Reply has no choices"));
        };
        let content = choice
            .message
            .content
            .ok_or_else(|| AppError::external_service(CHAT_ENDPOINT, "Reply has no content"))?;

        debug!(
            provider = self.config.provider_name,
            content_len = content.len(),
            finish_reason = ?choice.finish_reason,
            "Chat completion received"
        );

        Ok(ChatResponse {
            content,
            model: reply.model,
            usage: reply.usage.map(|usage| TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(endpoint: &str) -> OpenAiCompatibleProvider {
        let mut config = OpenAiCompatibleConfig::azure(endpoint, "key");
        config.endpoint = endpoint.to_owned();
        OpenAiCompatibleProvider::new(config).unwrap()
    }

    #[test]
    fn test_api_url_keeps_full_deployment_urls() {
        let url = "https://res.openai.azure.com/openai/deployments/gpt4o/chat/completions?api-version=2024-02-15-preview";
        assert_eq!(provider(url).api_url(), url);
        assert_eq!(
            provider("https://api.openai.com/v1/").api_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_error_statuses() {
        let body = r#"{"error":{"message":"bad key","type":"invalid_request_error"}}"#;
        let err = OpenAiCompatibleProvider::error_from_status(StatusCode::UNAUTHORIZED, body);
        assert_eq!(err.code, ErrorCode::AuthInvalid);

        let err = OpenAiCompatibleProvider::error_from_status(StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![ChatMessage::user("hi")];
        let body = serde_json::to_value(OpenAiRequest {
            model: None,
            messages: &messages,
            temperature: Some(0.7),
            top_p: Some(0.95),
            max_tokens: Some(800),
        })
        .unwrap();
        assert!(body.get("model").is_none());
        assert_eq!(body["max_tokens"], 800);
        assert_eq!(body["messages"][0]["content"][0]["type"], "text");
    }

    #[test]
    fn test_key_style_parsing() {
        assert_eq!(ApiKeyStyle::parse("api-key"), Some(ApiKeyStyle::ApiKeyHeader));
        assert_eq!(ApiKeyStyle::parse("Bearer"), Some(ApiKeyStyle::Bearer));
        assert_eq!(ApiKeyStyle::parse("basic"), None);
    }
}
