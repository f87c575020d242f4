// ABOUTME: Authentication provider contract and the signed-in session type
// ABOUTME: Firebase Identity Toolkit implementation plus persisted session management
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Authentication
//!
//! Sign-in, sign-up, federated sign-in with a Google ID token, token refresh,
//! password-reset e-mail dispatch, and display-name update. Failures surface
//! as user-visible errors and are never retried.
//!
//! [`SessionManager`] owns the current session, persists its refresh token
//! between runs, and keeps the document backend's ID token in sync.

/// Firebase Identity Toolkit client
pub mod firebase;
/// Current session lifecycle and persistence
pub mod session;

pub use firebase::FirebaseAuthProvider;
pub use session::{PersistedSession, SessionFile, SessionManager};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::AppResult;
use crate::models::UserIdentity;

/// A signed-in user plus the tokens proving it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Who is signed in
    pub identity: UserIdentity,
    /// Short-lived token sent to the document backend
    pub id_token: String,
    /// Long-lived token used to mint new ID tokens
    pub refresh_token: String,
    /// When `id_token` stops being accepted
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    /// Whether the ID token has expired at `now`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Authentication backend contract
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Sign in with e-mail and password
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// Create an account and sign it in
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// Sign in with an ID token issued by Google
    async fn sign_in_with_google(&self, google_id_token: &str) -> AppResult<AuthSession>;

    /// Exchange a refresh token for a fresh session
    async fn refresh(&self, refresh_token: &str) -> AppResult<AuthSession>;

    /// Send a password-reset e-mail
    async fn send_password_reset(&self, email: &str) -> AppResult<()>;

    /// Change the display name of the signed-in user
    async fn update_display_name(
        &self,
        session: &AuthSession,
        display_name: &str,
    ) -> AppResult<UserIdentity>;
}
