// ABOUTME: Environment configuration parsing for Firebase, chat endpoint, and session storage
// ABOUTME: Validates URLs and numeric ranges, reporting problems as ConfigInvalid errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{debug, info};
use url::Url;

use crate::constants::chat::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P};
use crate::constants::service_names::COOK_AI;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::llm::{ApiKeyStyle, LlmCapabilities, OpenAiCompatibleConfig};

/// Firestore database used when none is configured
const DEFAULT_DATABASE_ID: &str = "(default)";
/// Default live-subscription poll interval
const DEFAULT_POLL_INTERVAL_MS: &str = "2000";
/// Production Firestore REST host
const FIRESTORE_HOST: &str = "https://firestore.googleapis.com";
/// Production Identity Toolkit host
const IDENTITY_TOOLKIT_HOST: &str = "https://identitytoolkit.googleapis.com";
/// Production Secure Token host
const SECURE_TOKEN_HOST: &str = "https://securetoken.googleapis.com";
/// Session file name inside the data directory
const SESSION_FILE_NAME: &str = "session.json";

/// Firebase project settings
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Google Cloud project id
    pub project_id: String,
    /// Web API key
    pub api_key: String,
    /// Firestore database id
    pub database_id: String,
    /// Interval between polls backing live subscriptions
    pub poll_interval: Duration,
    /// Firestore REST host (emulator aware)
    pub firestore_host: String,
    /// Identity Toolkit host (emulator aware)
    pub identity_toolkit_host: String,
    /// Secure Token host (emulator aware)
    pub secure_token_host: String,
}

impl FirebaseConfig {
    /// Load from `FIREBASE_*` variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` when the project id or API key is unset, and
    /// `ConfigInvalid` for malformed values.
    pub fn from_env() -> AppResult<Self> {
        let project_id = required("FIREBASE_PROJECT_ID")?;
        let api_key = required("FIREBASE_API_KEY")?;
        let database_id = env_var_or("FIREBASE_DATABASE_ID", DEFAULT_DATABASE_ID);
        let poll_ms: u64 = parse_env("FIRESTORE_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?;
        if poll_ms == 0 {
            return Err(AppError::config_invalid(
                "FIRESTORE_POLL_INTERVAL_MS",
                "must be greater than zero",
            ));
        }

        let firestore_host = emulator_or("FIRESTORE_EMULATOR_HOST", FIRESTORE_HOST)?;
        let auth_emulator = env::var("FIREBASE_AUTH_EMULATOR_HOST").ok();
        let (identity_toolkit_host, secure_token_host) = match auth_emulator {
            // The auth emulator serves both APIs under host-prefixed paths
            Some(host) => {
                let base = validate_url("FIREBASE_AUTH_EMULATOR_HOST", &format!("http://{host}"))?;
                (
                    format!("{base}/identitytoolkit.googleapis.com"),
                    format!("{base}/securetoken.googleapis.com"),
                )
            }
            None => (IDENTITY_TOOLKIT_HOST.to_owned(), SECURE_TOKEN_HOST.to_owned()),
        };

        Ok(Self {
            project_id,
            api_key,
            database_id,
            poll_interval: Duration::from_millis(poll_ms),
            firestore_host,
            identity_toolkit_host,
            secure_token_host,
        })
    }

    /// Root of the Firestore documents resource
    #[must_use]
    pub fn documents_root(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/{}/documents",
            self.firestore_host, self.project_id, self.database_id
        )
    }
}

/// Chat completion endpoint settings
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Endpoint URL
    pub endpoint: String,
    /// API key
    pub api_key: Option<String>,
    /// How the key is sent
    pub key_style: ApiKeyStyle,
    /// Model name for endpoints that take one in the body
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling mass
    pub top_p: f32,
    /// Completion token cap
    pub max_tokens: u32,
}

impl ChatConfig {
    /// Load from `CHAT_*` variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` when `CHAT_ENDPOINT` is unset, and
    /// `ConfigInvalid` for malformed values.
    pub fn from_env() -> AppResult<Self> {
        let endpoint = validate_url("CHAT_ENDPOINT", &required("CHAT_ENDPOINT")?)?;
        let api_key = env::var("CHAT_API_KEY").ok().filter(|k| !k.is_empty());
        let style = env_var_or("CHAT_AUTH_STYLE", "api-key");
        let key_style = ApiKeyStyle::parse(&style).ok_or_else(|| {
            AppError::config_invalid("CHAT_AUTH_STYLE", format!("unknown style '{style}'"))
        })?;
        let model = env::var("CHAT_MODEL").ok().filter(|m| !m.is_empty());

        let temperature: f32 = parse_env("CHAT_TEMPERATURE", &DEFAULT_TEMPERATURE.to_string())?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(AppError::config_invalid(
                "CHAT_TEMPERATURE",
                "must be between 0 and 2",
            ));
        }
        let top_p: f32 = parse_env("CHAT_TOP_P", &DEFAULT_TOP_P.to_string())?;
        if !(0.0..=1.0).contains(&top_p) {
            return Err(AppError::config_invalid("CHAT_TOP_P", "must be between 0 and 1"));
        }
        let max_tokens: u32 = parse_env("CHAT_MAX_TOKENS", &DEFAULT_MAX_TOKENS.to_string())?;

        Ok(Self {
            endpoint,
            api_key,
            key_style,
            model,
            temperature,
            top_p,
            max_tokens,
        })
    }

    /// Provider configuration for this endpoint
    #[must_use]
    pub fn provider_config(&self) -> OpenAiCompatibleConfig {
        OpenAiCompatibleConfig {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            key_style: self.key_style,
            default_model: self.model.clone(),
            provider_name: match self.key_style {
                ApiKeyStyle::ApiKeyHeader => "azure-openai",
                ApiKeyStyle::Bearer => "openai",
            },
            capabilities: LlmCapabilities::multimodal(),
        }
    }
}

/// Complete application configuration
///
/// Firebase and chat sections are optional so commands that do not need them
/// still run; the commands that do report the missing variable.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Firebase settings, `None` when not configured
    pub firebase: Option<FirebaseConfig>,
    /// Chat settings, `None` when not configured
    pub chat: Option<ChatConfig>,
    /// Path of the persisted auth session
    pub session_file: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` when a variable is set but malformed, or
    /// `ConfigMissing` when no session file location can be determined.
    pub fn from_env() -> AppResult<Self> {
        let firebase = optional_section(FirebaseConfig::from_env())?;
        let chat = optional_section(ChatConfig::from_env())?;
        let session_file = match env::var("COOKAI_SESSION_FILE") {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => default_session_file()?,
        };

        info!(
            firebase = firebase.is_some(),
            chat = chat.is_some(),
            session_file = %session_file.display(),
            "Configuration loaded"
        );
        Ok(Self {
            firebase,
            chat,
            session_file,
        })
    }

    /// Firebase settings or a `ConfigMissing` error naming the variable
    ///
    /// # Errors
    ///
    /// Returns an error when Firebase is not configured.
    pub fn require_firebase(&self) -> AppResult<&FirebaseConfig> {
        self.firebase
            .as_ref()
            .ok_or_else(|| AppError::config_missing("FIREBASE_PROJECT_ID"))
    }

    /// Chat settings or a `ConfigMissing` error naming the variable
    ///
    /// # Errors
    ///
    /// Returns an error when the chat endpoint is not configured.
    pub fn require_chat(&self) -> AppResult<&ChatConfig> {
        self.chat
            .as_ref()
            .ok_or_else(|| AppError::config_missing("CHAT_ENDPOINT"))
    }
}

/// Treat a missing section as absent, but keep real validation errors
fn optional_section<T>(result: AppResult<T>) -> AppResult<Option<T>> {
    match result {
        Ok(section) => Ok(Some(section)),
        Err(e) if e.code == ErrorCode::ConfigMissing => {
            debug!("Optional configuration section skipped: {}", e.message);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn default_session_file() -> AppResult<PathBuf> {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join(COOK_AI).join(SESSION_FILE_NAME))
        .ok_or_else(|| AppError::config_missing("COOKAI_SESSION_FILE"))
}

fn required(key: &str) -> AppResult<String> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::config_missing(key))
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T>(key: &str, default: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = env_var_or(key, default);
    raw.trim()
        .parse()
        .map_err(|e| AppError::config_invalid(key, format!("'{raw}': {e}")))
}

fn validate_url(key: &str, value: &str) -> AppResult<String> {
    let parsed = Url::parse(value).map_err(|e| AppError::config_invalid(key, e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::config_invalid(
            key,
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }
    Ok(value.trim_end_matches('/').to_owned())
}

fn emulator_or(key: &str, production: &str) -> AppResult<String> {
    env::var(key).map_or_else(
        |_| Ok(production.to_owned()),
        |host| validate_url(key, &format!("http://{host}")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert_eq!(
            validate_url("X", "https://example.com/v1/").unwrap(),
            "https://example.com/v1"
        );
        assert!(validate_url("X", "not a url").is_err());
        assert!(validate_url("X", "ftp://example.com").is_err());
    }

    #[test]
    fn test_documents_root() {
        let config = FirebaseConfig {
            project_id: "cook-ai-demo".to_owned(),
            api_key: "key".to_owned(),
            database_id: DEFAULT_DATABASE_ID.to_owned(),
            poll_interval: Duration::from_secs(2),
            firestore_host: FIRESTORE_HOST.to_owned(),
            identity_toolkit_host: IDENTITY_TOOLKIT_HOST.to_owned(),
            secure_token_host: SECURE_TOKEN_HOST.to_owned(),
        };
        assert_eq!(
            config.documents_root(),
            "https://firestore.googleapis.com/v1/projects/cook-ai-demo/databases/(default)/documents"
        );
    }
}
