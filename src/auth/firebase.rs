// ABOUTME: Firebase Authentication REST client (Identity Toolkit v1 and Secure Token API)
// ABOUTME: Maps Firebase error codes such as INVALID_PASSWORD to user-facing AppErrors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Firebase Authentication over REST
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cook_ai::auth::{AuthProvider, FirebaseAuthProvider};
//! use cook_ai::config::FirebaseConfig;
//!
//! # async fn example() -> cook_ai::errors::AppResult<()> {
//! let config = FirebaseConfig::from_env()?;
//! let auth = FirebaseAuthProvider::new(&config)?;
//! let session = auth.sign_in("chef@example.com", "secret").await?;
//! println!("Signed in as {}", session.identity.uid);
//! # Ok(())
//! # }
//! ```

use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use super::{AuthProvider, AuthSession};
use crate::config::FirebaseConfig;
use crate::constants::service_names::FIREBASE_AUTH;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::logging::AppLogger;
use crate::models::UserIdentity;

/// Request timeout for auth calls
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Redirect URI required by `signInWithIdp`; only checked for web flows
const IDP_REQUEST_URI: &str = "http://localhost";

/// ID token lifetime assumed when the response omits it
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Response of the password, sign-up, and IdP endpoints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

/// Response of the Secure Token API
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    user_id: String,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountInfo>,
}

/// Account record from `accounts:lookup` and `accounts:update`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

impl From<AccountInfo> for UserIdentity {
    fn from(info: AccountInfo) -> Self {
        Self {
            uid: info.local_id,
            display_name: info.display_name,
            email: info.email,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FirebaseErrorResponse {
    error: FirebaseErrorDetail,
}

#[derive(Debug, Deserialize)]
struct FirebaseErrorDetail {
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

/// Firebase Authentication client
pub struct FirebaseAuthProvider {
    client: Client,
    api_key: String,
    identity_toolkit_host: String,
    secure_token_host: String,
}

impl FirebaseAuthProvider {
    /// Create a client for the configured project
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &FirebaseConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            identity_toolkit_host: config.identity_toolkit_host.clone(),
            secure_token_host: config.secure_token_host.clone(),
        })
    }

    fn accounts_url(&self, operation: &str) -> String {
        format!("{}/v1/accounts:{operation}", self.identity_toolkit_host)
    }

    async fn post_accounts<B, T>(&self, operation: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.accounts_url(operation))
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Self::parse_error_response(&body));
        }
        serde_json::from_str(&body).map_err(|e| {
            AppError::external_service(FIREBASE_AUTH, format!("Failed to parse response: {e}"))
        })
    }

    /// Translate Firebase's `error.message` codes
    ///
    /// Messages look like `INVALID_PASSWORD` or
    /// `WEAK_PASSWORD : Password should be at least 6 characters`.
    fn parse_error_response(body: &str) -> AppError {
        let Ok(parsed) = serde_json::from_str::<FirebaseErrorResponse>(body) else {
            return AppError::external_service(
                FIREBASE_AUTH,
                body.chars().take(200).collect::<String>(),
            );
        };
        let message = parsed.error.message;
        let (code, detail) = message
            .split_once(" : ")
            .map_or((message.as_str(), None), |(code, detail)| (code, Some(detail)));

        match code {
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
                AppError::auth_invalid("Incorrect e-mail or password.")
            }
            "USER_DISABLED" => AppError::auth_invalid("This account has been disabled."),
            "EMAIL_EXISTS" => {
                AppError::invalid_input("An account with this e-mail already exists.")
            }
            "INVALID_EMAIL" | "MISSING_EMAIL" => {
                AppError::invalid_input("Please enter a valid e-mail address.")
            }
            "MISSING_PASSWORD" => AppError::invalid_input("Please enter a password."),
            "WEAK_PASSWORD" => AppError::invalid_input(
                detail.unwrap_or("Password should be at least 6 characters"),
            ),
            "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "INVALID_ID_TOKEN" | "USER_NOT_FOUND" => {
                AppError::auth_expired(code.to_owned())
            }
            "INVALID_IDP_RESPONSE" => {
                AppError::auth_invalid("Google sign-in was rejected. Please try again.")
            }
            "TOO_MANY_ATTEMPTS_TRY_LATER" => AppError::new(ErrorCode::ExternalRateLimited, code),
            _ => AppError::external_service(FIREBASE_AUTH, message.clone()),
        }
    }

    fn expires_at(expires_in: Option<&str>) -> DateTime<Utc> {
        let secs = expires_in
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        Utc::now() + Duration::seconds(secs)
    }

    fn session_from(response: SignInResponse) -> AuthSession {
        let expires_at = Self::expires_at(response.expires_in.as_deref());
        AuthSession {
            identity: UserIdentity {
                uid: response.local_id,
                display_name: response.display_name.filter(|n| !n.is_empty()),
                email: response.email.filter(|e| !e.is_empty()),
            },
            id_token: response.id_token,
            refresh_token: response.refresh_token,
            expires_at,
        }
    }

    fn log_result<T>(result: &AppResult<T>, subject: &str, event: &str) {
        match result {
            Ok(_) => AppLogger::log_auth_event(subject, event, true, None),
            Err(e) => AppLogger::log_auth_event(subject, event, false, Some(&e.message)),
        }
    }
}

#[async_trait]
impl AuthProvider for FirebaseAuthProvider {
    #[instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let result = self
            .post_accounts("signInWithPassword", &body)
            .await
            .map(Self::session_from);
        Self::log_result(&result, email, "sign_in");
        result
    }

    #[instrument(skip(self, password))]
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let result = self
            .post_accounts("signUp", &body)
            .await
            .map(Self::session_from);
        Self::log_result(&result, email, "sign_up");
        result
    }

    #[instrument(skip_all)]
    async fn sign_in_with_google(&self, google_id_token: &str) -> AppResult<AuthSession> {
        let body = json!({
            "postBody": format!("id_token={google_id_token}&providerId=google.com"),
            "requestUri": IDP_REQUEST_URI,
            "returnSecureToken": true,
            "returnIdpCredential": true,
        });
        let result = self
            .post_accounts("signInWithIdp", &body)
            .await
            .map(Self::session_from);
        Self::log_result(&result, "google", "sign_in_with_google");
        result
    }

    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> AppResult<AuthSession> {
        let response = self
            .client
            .post(format!("{}/v1/token", self.secure_token_host))
            .query(&[("key", self.api_key.as_str())])
            .form(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
            .send()
            .await?;
        let refreshed: RefreshResponse = Self::parse_response(response).await?;

        // The token endpoint returns no profile data
        let lookup: LookupResponse = self
            .post_accounts("lookup", &json!({ "idToken": refreshed.id_token }))
            .await?;
        let identity = lookup
            .users
            .into_iter()
            .next()
            .map_or_else(
                || UserIdentity {
                    uid: refreshed.user_id.clone(),
                    display_name: None,
                    email: None,
                },
                UserIdentity::from,
            );

        debug!(uid = %identity.uid, "Refreshed session");
        Ok(AuthSession {
            identity,
            expires_at: Self::expires_at(refreshed.expires_in.as_deref()),
            id_token: refreshed.id_token,
            refresh_token: refreshed.refresh_token,
        })
    }

    #[instrument(skip(self))]
    async fn send_password_reset(&self, email: &str) -> AppResult<()> {
        let body = json!({ "requestType": "PASSWORD_RESET", "email": email });
        let result = self
            .post_accounts::<_, serde_json::Value>("sendOobCode", &body)
            .await
            .map(|_| ());
        Self::log_result(&result, email, "password_reset");
        result
    }

    #[instrument(skip(self, session), fields(uid = %session.identity.uid))]
    async fn update_display_name(
        &self,
        session: &AuthSession,
        display_name: &str,
    ) -> AppResult<UserIdentity> {
        let body = json!({
            "idToken": session.id_token,
            "displayName": display_name,
            "returnSecureToken": false,
        });
        let account: AccountInfo = self.post_accounts("update", &body).await?;
        AppLogger::log_auth_event(&session.identity.uid, "update_display_name", true, None);
        Ok(account.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_body(message: &str) -> String {
        json!({"error": {"code": 400, "message": message, "errors": []}}).to_string()
    }

    #[test]
    fn test_credential_errors_are_user_visible() {
        let err = FirebaseAuthProvider::parse_error_response(&error_body("INVALID_PASSWORD"));
        assert_eq!(err.code, ErrorCode::AuthInvalid);
        assert_eq!(err.user_message(), "Incorrect e-mail or password.");
    }

    #[test]
    fn test_weak_password_keeps_firebase_detail() {
        let err = FirebaseAuthProvider::parse_error_response(&error_body(
            "WEAK_PASSWORD : Password should be at least 6 characters",
        ));
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert_eq!(err.message, "Password should be at least 6 characters");
    }

    #[test]
    fn test_refresh_failures_expire_the_session() {
        let err = FirebaseAuthProvider::parse_error_response(&error_body("TOKEN_EXPIRED"));
        assert_eq!(err.code, ErrorCode::AuthExpired);
    }

    #[test]
    fn test_sign_in_response_becomes_session() {
        let response: SignInResponse = serde_json::from_value(json!({
            "localId": "u1",
            "email": "chef@example.com",
            "displayName": "",
            "idToken": "id",
            "refreshToken": "refresh",
            "expiresIn": "3600"
        }))
        .unwrap();
        let session = FirebaseAuthProvider::session_from(response);
        assert_eq!(session.identity.uid, "u1");
        assert_eq!(session.identity.display_name, None);
        assert!(!session.is_expired(Utc::now()));
    }
}
