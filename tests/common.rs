// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Quiet logging, seeded in-memory backend, scripted chat provider, fake auth backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `cook_ai`

use std::collections::VecDeque;
use std::env;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use cook_ai::auth::{AuthProvider, AuthSession};
use cook_ai::backend::memory::InMemoryDocumentStore;
use cook_ai::backend::{CollectionPath, DocumentStore};
use cook_ai::constants::collections;
use cook_ai::errors::{AppError, AppResult};
use cook_ai::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use cook_ai::models::{Recipe, UserIdentity};
use serde_json::json;
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn recipe(id: &str, ingredients: &[&str]) -> Recipe {
    Recipe {
        id: id.to_owned(),
        name: format!("Recipe {id}"),
        cook_time: 20,
        calories: 350.0,
        steps: vec!["Mix".to_owned(), "Cook".to_owned()],
        ingredients: ingredients.iter().map(|&i| i.to_owned()).collect(),
        ..Recipe::default()
    }
}

pub fn identity(uid: &str, name: &str) -> UserIdentity {
    UserIdentity {
        uid: uid.to_owned(),
        display_name: Some(name.to_owned()),
        email: Some(format!("{uid}@example.com")),
    }
}

pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|&i| i.to_owned()).collect()
}

/// Fresh in-memory backend with logging initialised
pub fn memory_store() -> Arc<InMemoryDocumentStore> {
    init_test_logging();
    Arc::new(InMemoryDocumentStore::new())
}

/// Store a recipe document (without feedback) at `recipes/{id}`
pub async fn seed_recipe(store: &InMemoryDocumentStore, recipe: &Recipe) {
    let fields = json!({
        "name": recipe.name,
        "image": recipe.image,
        "calories": recipe.calories,
        "cookTime": recipe.cook_time,
        "steps": recipe.steps,
        "ingredients": recipe.ingredients,
    });
    let path = CollectionPath::root(collections::RECIPES).doc(recipe.id.clone());
    store
        .set(&path, fields.as_object().unwrap().clone())
        .await
        .unwrap();
}

pub async fn seed_ingredient(store: &InMemoryDocumentStore, name: &str) {
    let fields = json!({ "name": name, "image": format!("https://img.example/{name}.png") });
    store
        .add(
            &CollectionPath::root(collections::INGREDIENTS),
            fields.as_object().unwrap().clone(),
        )
        .await
        .unwrap();
}

/// Add a raw rating record under a recipe
pub async fn seed_rating(store: &InMemoryDocumentStore, recipe_id: &str, uid: &str, rating: u8) {
    let collection = CollectionPath::root(collections::RECIPES)
        .doc(recipe_id)
        .collection(collections::RATINGS);
    let fields = json!({ "uid": uid, "username": uid, "rating": rating });
    store
        .add(&collection, fields.as_object().unwrap().clone())
        .await
        .unwrap();
}

// ============================================================================
// Scripted chat provider
// ============================================================================

/// Chat provider answering from a queue and recording every request
pub struct ScriptedLlm {
    capabilities: LlmCapabilities,
    replies: Mutex<VecDeque<AppResult<String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlm {
    pub fn new(capabilities: LlmCapabilities, replies: Vec<AppResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            capabilities,
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.capabilities
    }

    fn default_model(&self) -> Option<&str> {
        None
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::internal("no scripted reply left")))?;
        Ok(ChatResponse {
            content: reply,
            model: "scripted-model".to_owned(),
            usage: None,
            finish_reason: Some("stop".to_owned()),
        })
    }
}

// ============================================================================
// Fake auth backend
// ============================================================================

/// Auth backend that accepts one password and one refresh token
pub struct FakeAuth {
    pub password: String,
    pub valid_refresh_token: Mutex<Option<String>>,
}

impl FakeAuth {
    pub fn new(password: &str) -> Arc<Self> {
        Arc::new(Self {
            password: password.to_owned(),
            valid_refresh_token: Mutex::new(Some("refresh-1".to_owned())),
        })
    }

    /// Make the issued refresh token unusable, as after a revocation
    pub fn revoke(&self) {
        *self.valid_refresh_token.lock().unwrap() = None;
    }

    fn session(&self, email: &str) -> AuthSession {
        let uid = email.split('@').next().unwrap_or(email);
        AuthSession {
            identity: UserIdentity {
                uid: uid.to_owned(),
                display_name: None,
                email: Some(email.to_owned()),
            },
            id_token: format!("id-token-{uid}"),
            refresh_token: "refresh-1".to_owned(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        if password == self.password {
            Ok(self.session(email))
        } else {
            Err(AppError::auth_invalid("Incorrect e-mail or password."))
        }
    }

    async fn sign_up(&self, email: &str, _password: &str) -> AppResult<AuthSession> {
        Ok(self.session(email))
    }

    async fn sign_in_with_google(&self, _google_id_token: &str) -> AppResult<AuthSession> {
        Ok(self.session("google-user@example.com"))
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<AuthSession> {
        let valid = self.valid_refresh_token.lock().unwrap().clone();
        if valid.as_deref() == Some(refresh_token) {
            Ok(self.session("chef@example.com"))
        } else {
            Err(AppError::auth_expired("Your session has expired. Please sign in again."))
        }
    }

    async fn send_password_reset(&self, _email: &str) -> AppResult<()> {
        Ok(())
    }

    async fn update_display_name(
        &self,
        session: &AuthSession,
        display_name: &str,
    ) -> AppResult<UserIdentity> {
        Ok(UserIdentity {
            display_name: Some(display_name.to_owned()),
            ..session.identity.clone()
        })
    }
}
