// ABOUTME: Signed-in session lifecycle with refresh-token persistence across runs
// ABOUTME: Keeps the document backend's ID token in sync with the current session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info, warn};

use super::{AuthProvider, AuthSession};
use crate::backend::firestore::IdToken;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::UserIdentity;

/// What survives between runs: the identity and the refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    /// Identity at the time of sign-in
    pub identity: UserIdentity,
    /// Token used to mint a fresh ID token on launch
    pub refresh_token: String,
}

/// JSON file holding the persisted session
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    /// Session file at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted session, `None` if there is none
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file exists but cannot be read or parsed.
    pub async fn load(&self) -> AppResult<Option<PersistedSession>> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(|e| {
                AppError::storage(format!("Corrupt session file {}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::storage(format!(
                "Cannot read session file {}: {e}",
                self.path.display()
            ))),
        }
    }

    /// Write the session, creating parent directories as needed
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be written.
    pub async fn save(&self, session: &PersistedSession) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(session)?;
        fs::write(&self.path, bytes).await?;
        debug!(path = %self.path.display(), "Persisted session");
        Ok(())
    }

    /// Remove the session file; a missing file is not an error
    ///
    /// # Errors
    ///
    /// Returns a storage error if an existing file cannot be removed.
    pub async fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Owns the current session
///
/// Every successful sign-in, refresh, or restore persists the refresh token and
/// publishes the ID token to the backend; sign-out undoes both.
pub struct SessionManager {
    provider: Arc<dyn AuthProvider>,
    file: SessionFile,
    id_token: IdToken,
    current: Option<AuthSession>,
}

impl SessionManager {
    /// Create a manager with no signed-in user
    #[must_use]
    pub fn new(provider: Arc<dyn AuthProvider>, file: SessionFile, id_token: IdToken) -> Self {
        Self {
            provider,
            file,
            id_token,
            current: None,
        }
    }

    /// Signed-in identity, if any
    #[must_use]
    pub fn current_user(&self) -> Option<&UserIdentity> {
        self.current.as_ref().map(|session| &session.identity)
    }

    /// Signed-in identity or an auth-required error with `message`
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when nobody is signed in.
    pub fn require_user(&self, message: &str) -> AppResult<&UserIdentity> {
        self.current_user()
            .ok_or_else(|| AppError::auth_required(message))
    }

    /// Restore the session persisted by an earlier run
    ///
    /// An expired or revoked refresh token clears the file and leaves the user
    /// signed out.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or the auth backend fails
    /// for reasons other than an invalid token.
    pub async fn restore(&mut self) -> AppResult<Option<&UserIdentity>> {
        let Some(persisted) = self.file.load().await? else {
            debug!("No persisted session");
            return Ok(None);
        };
        match self.provider.refresh(&persisted.refresh_token).await {
            Ok(session) => {
                info!(uid = %session.identity.uid, "Restored session");
                self.activate(session).await?;
                Ok(self.current_user())
            }
            Err(e) if e.code == ErrorCode::AuthExpired || e.code == ErrorCode::AuthInvalid => {
                warn!(uid = %persisted.identity.uid, "Persisted session is no longer valid: {e}");
                self.file.clear().await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Refresh the ID token if it has expired
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh is rejected.
    pub async fn ensure_fresh(&mut self) -> AppResult<()> {
        let Some(session) = &self.current else {
            return Ok(());
        };
        if session.is_expired(Utc::now()) {
            let refreshed = self.provider.refresh(&session.refresh_token).await?;
            self.activate(refreshed).await?;
        }
        Ok(())
    }

    /// Sign in with e-mail and password
    ///
    /// # Errors
    ///
    /// Returns the provider's error for rejected credentials.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> AppResult<&UserIdentity> {
        let (email, password) = Self::validate_credentials(email, password)?;
        let session = self.provider.sign_in(email, password).await?;
        self.activate(session).await
    }

    /// Create an account and sign it in
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the account cannot be created.
    pub async fn sign_up(&mut self, email: &str, password: &str) -> AppResult<&UserIdentity> {
        let (email, password) = Self::validate_credentials(email, password)?;
        let session = self.provider.sign_up(email, password).await?;
        self.activate(session).await
    }

    /// Sign in with a Google ID token
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the token is rejected.
    pub async fn sign_in_with_google(&mut self, google_id_token: &str) -> AppResult<&UserIdentity> {
        if google_id_token.trim().is_empty() {
            return Err(AppError::invalid_input("A Google ID token is required."));
        }
        let session = self.provider.sign_in_with_google(google_id_token.trim()).await?;
        self.activate(session).await
    }

    /// Sign out and forget the persisted session
    ///
    /// # Errors
    ///
    /// Returns a storage error if the session file cannot be removed.
    pub async fn sign_out(&mut self) -> AppResult<()> {
        if let Some(session) = self.current.take() {
            info!(uid = %session.identity.uid, "Signed out");
        }
        self.id_token.set(None).await;
        self.file.clear().await
    }

    /// Send a password-reset e-mail
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank address, or the provider's error.
    pub async fn send_password_reset(&self, email: &str) -> AppResult<()> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::invalid_input("Please enter your e-mail address."));
        }
        self.provider.send_password_reset(email).await
    }

    /// Change the signed-in user's display name
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank name, `AuthRequired` when signed out,
    /// or the provider's error.
    pub async fn update_display_name(&mut self, name: &str) -> AppResult<&UserIdentity> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_input("Display name cannot be empty."));
        }
        let session = self
            .current
            .as_mut()
            .ok_or_else(|| AppError::auth_required("You must be logged in to change your name."))?;
        let updated = self.provider.update_display_name(session, name).await?;
        session.identity.display_name = updated.display_name.or_else(|| Some(name.to_owned()));
        let persisted = PersistedSession {
            identity: session.identity.clone(),
            refresh_token: session.refresh_token.clone(),
        };
        self.file.save(&persisted).await?;
        self.require_user("You must be logged in to change your name.")
    }

    fn validate_credentials<'a>(email: &'a str, password: &'a str) -> AppResult<(&'a str, &'a str)> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::invalid_input("Please enter your e-mail and password."));
        }
        Ok((email, password))
    }

    async fn activate(&mut self, session: AuthSession) -> AppResult<&UserIdentity> {
        self.file
            .save(&PersistedSession {
                identity: session.identity.clone(),
                refresh_token: session.refresh_token.clone(),
            })
            .await?;
        self.id_token.set(Some(session.id_token.clone())).await;
        Ok(&self.current.insert(session).identity)
    }
}
