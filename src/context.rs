// ABOUTME: Dependency container wiring backend, auth, services, and view state for one client
// ABOUTME: Built from configuration for production or from injected parts for tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::info;

use crate::auth::{AuthProvider, FirebaseAuthProvider, SessionFile, SessionManager};
use crate::backend::firestore::{FirestoreStore, IdToken};
use crate::backend::DocumentStore;
use crate::chat::{ChatSession, SamplingParams};
use crate::config::{AppConfig, ChatConfig};
use crate::errors::AppResult;
use crate::llm::OpenAiCompatibleProvider;
use crate::services::{FeedbackService, ProfileService, RecipeCatalog, SavedRecipes};
use crate::state::SelectionStore;

/// Everything a client session needs
///
/// Services share one backend handle. The selection store and the auth
/// session are owned here and mutated through `&mut self`.
pub struct AppContext {
    store: Arc<dyn DocumentStore>,
    catalog: RecipeCatalog,
    feedback: FeedbackService,
    saved: SavedRecipes,
    profile: ProfileService,
    /// Signed-in session
    pub session: SessionManager,
    /// Selected ingredients and recipe
    pub selection: SelectionStore,
}

impl AppContext {
    /// Assemble a context from its parts
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
        session_file: SessionFile,
        id_token: IdToken,
    ) -> Self {
        Self {
            catalog: RecipeCatalog::new(Arc::clone(&store)),
            feedback: FeedbackService::new(Arc::clone(&store)),
            saved: SavedRecipes::new(Arc::clone(&store)),
            profile: ProfileService::new(Arc::clone(&store)),
            session: SessionManager::new(auth, session_file, id_token),
            selection: SelectionStore::new(),
            store,
        }
    }

    /// Production context backed by Firestore and Firebase Authentication
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` without Firebase settings, or an error if an
    /// HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let firebase = config.require_firebase()?;
        let id_token = IdToken::default();
        let store = FirestoreStore::new(firebase, id_token.clone())?;
        let auth = FirebaseAuthProvider::new(firebase)?;
        info!(project = %firebase.project_id, "Using Firestore backend");
        Ok(Self::new(
            Arc::new(store),
            Arc::new(auth),
            SessionFile::new(config.session_file.clone()),
            id_token,
        ))
    }

    /// Shared backend handle
    #[must_use]
    pub const fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Ingredient and recipe reads
    #[must_use]
    pub const fn catalog(&self) -> &RecipeCatalog {
        &self.catalog
    }

    /// Rating and comment writes
    #[must_use]
    pub const fn feedback(&self) -> &FeedbackService {
        &self.feedback
    }

    /// Saved-recipe list
    #[must_use]
    pub const fn saved(&self) -> &SavedRecipes {
        &self.saved
    }

    /// Profile document
    #[must_use]
    pub const fn profile(&self) -> &ProfileService {
        &self.profile
    }
}

/// Start a chat session against the configured completion endpoint
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn chat_session(config: &ChatConfig) -> AppResult<ChatSession> {
    let provider = OpenAiCompatibleProvider::new(config.provider_config())?;
    Ok(ChatSession::new(Arc::new(provider)).with_sampling(SamplingParams::from(config)))
}
