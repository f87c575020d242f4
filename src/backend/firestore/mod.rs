// ABOUTME: Cloud Firestore REST v1 document backend
// ABOUTME: Typed-value wire format, structured queries, and poll-based live subscriptions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Firestore Backend
//!
//! Talks to the Firestore REST API with `reqwest`. Requests carry the project
//! API key and, once a user is signed in, their ID token so security rules see
//! the caller.
//!
//! The REST API has no push channel, so live subscriptions poll the target at
//! [`FirebaseConfig::poll_interval`] and forward a snapshot only when it
//! differs from the previous one. A polling task stops as soon as its
//! subscription is disposed.

/// Typed value conversion
pub mod value;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::{mpsc, RwLock};
use tokio::time::{self as tokio_time, interval_at, MissedTickBehavior};
use tracing::{debug, error, instrument, warn};

use super::{
    CollectionPath, CollectionSubscription, Document, DocumentPath, DocumentStore,
    DocumentSubscription, FieldFilter, Fields, Subscription,
};
use crate::config::FirebaseConfig;
use crate::constants::service_names::FIRESTORE;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::logging::AppLogger;
use value::{decode_document, encode_fields, to_firestore_value};

/// Request timeout for Firestore calls
const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Connect timeout for Firestore calls
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// ID token of the signed-in user, shared with the auth layer
#[derive(Debug, Clone, Default)]
pub struct IdToken(Arc<RwLock<Option<String>>>);

impl IdToken {
    /// Replace the current token
    pub async fn set(&self, token: Option<String>) {
        *self.0.write().await = token;
    }

    /// Current token, if signed in
    pub async fn get(&self) -> Option<String> {
        self.0.read().await.clone()
    }
}

/// Error envelope returned by Google APIs
#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Firestore REST backend
#[derive(Clone)]
pub struct FirestoreStore {
    client: Client,
    documents_root: String,
    api_key: String,
    poll_interval: Duration,
    id_token: IdToken,
}

impl FirestoreStore {
    /// Create a backend for the configured project
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &FirebaseConfig, id_token: IdToken) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            documents_root: config.documents_root(),
            api_key: config.api_key.clone(),
            poll_interval: config.poll_interval,
            id_token,
        })
    }

    fn document_url(&self, path: &DocumentPath) -> String {
        format!("{}/{path}", self.documents_root)
    }

    fn run_query_url(&self, collection: &CollectionPath) -> String {
        match collection.parent() {
            Some(parent) => format!("{}/{parent}:runQuery", self.documents_root),
            None => format!("{}:runQuery", self.documents_root),
        }
    }

    /// Attach the API key and, when signed in, the user's ID token
    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.query(&[("key", self.api_key.as_str())]);
        match self.id_token.get().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        self.authorize(request).await.send().await.map_err(|e| {
            error!("Failed to reach Firestore: {e}");
            AppError::from(e)
        })
    }

    /// Read a successful JSON body or map the error status
    async fn json_body(response: Response) -> AppResult<Value> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::external_service(FIRESTORE, format!("Failed to read response: {e}")))?;
        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| {
            AppError::external_service(FIRESTORE, format!("Failed to parse response: {e}"))
        })
    }

    fn parse_error_response(status: StatusCode, body: &str) -> AppError {
        let (message, google_status) = serde_json::from_str::<GoogleErrorResponse>(body).map_or_else(
            |_| (body.chars().take(200).collect::<String>(), None),
            |parsed| (parsed.error.message, parsed.error.status),
        );
        match status.as_u16() {
            401 => AppError::auth_expired(format!("Firestore rejected the session: {message}")),
            403 => AppError::auth_invalid(format!("Permission denied: {message}")),
            404 => AppError::not_found(format!("Firestore document ({message})")),
            409 => AppError::new(ErrorCode::ResourceAlreadyExists, message),
            429 => AppError::new(ErrorCode::ExternalRateLimited, message),
            500..=599 => AppError::external_unavailable(FIRESTORE, message),
            _ => AppError::external_service(
                FIRESTORE,
                format!("{} - {message}", google_status.as_deref().unwrap_or("UNKNOWN")),
            ),
        }
    }

    fn filter_json(filter: &FieldFilter) -> Value {
        let (field, op, value) = match filter {
            FieldFilter::Equal { field, value } => (field, "EQUAL", to_firestore_value(value)),
            FieldFilter::ArrayContainsAny { field, values } => (
                field,
                "ARRAY_CONTAINS_ANY",
                to_firestore_value(&Value::Array(values.clone())),
            ),
        };
        json!({
            "fieldFilter": {
                "field": { "fieldPath": field },
                "op": op,
                "value": value
            }
        })
    }

    fn log_operation(operation: &str, target: &str, success: bool, started: Instant) {
        let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        AppLogger::log_backend_operation(operation, target, success, elapsed);
    }

    /// Spawn the polling loop feeding a subscription
    fn spawn_poller<T, F, Fut>(&self, sender: mpsc::UnboundedSender<T>, initial: T, fetch: F)
    where
        T: PartialEq + Clone + Send + 'static,
        F: Fn(Self) -> Fut + Send + 'static,
        Fut: Future<Output = AppResult<T>> + Send,
    {
        let store = self.clone();
        let period = self.poll_interval;
        tokio::spawn(async move {
            let mut ticker = interval_at(tokio_time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last = initial;
            loop {
                tokio::select! {
                    () = sender.closed() => {
                        debug!("Subscription disposed, stopping Firestore poller");
                        break;
                    }
                    _ = ticker.tick() => {
                        match fetch(store.clone()).await {
                            Ok(snapshot) if snapshot != last => {
                                if sender.send(snapshot.clone()).is_err() {
                                    break;
                                }
                                last = snapshot;
                            }
                            Ok(_) => {}
                            Err(e) => warn!("Firestore poll failed: {e}"),
                        }
                    }
                }
            }
        });
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn backend_name(&self) -> &'static str {
        "firestore"
    }

    #[instrument(skip(self), fields(%path))]
    async fn get(&self, path: &DocumentPath) -> AppResult<Option<Document>> {
        let started = Instant::now();
        let response = self.send(self.client.get(self.document_url(path))).await?;
        if response.status() == StatusCode::NOT_FOUND {
            Self::log_operation("get", &path.to_string(), true, started);
            return Ok(None);
        }
        let result = Self::json_body(response).await.and_then(|body| decode_document(&body));
        Self::log_operation("get", &path.to_string(), result.is_ok(), started);
        result.map(Some)
    }

    #[instrument(skip(self, filter), fields(%collection))]
    async fn query(
        &self,
        collection: &CollectionPath,
        filter: Option<&FieldFilter>,
    ) -> AppResult<Vec<Document>> {
        let started = Instant::now();
        let mut structured = json!({ "from": [{ "collectionId": collection.collection_id() }] });
        if let Some(filter) = filter {
            structured["where"] = Self::filter_json(filter);
        }
        let request = self
            .client
            .post(self.run_query_url(collection))
            .json(&json!({ "structuredQuery": structured }));

        let body = Self::json_body(self.send(request).await?).await;
        let result = body.and_then(|body| {
            // One entry per result; an empty result set is a single entry without `document`
            body.as_array()
                .map(Vec::as_slice)
                .unwrap_or_default()
                .iter()
                .filter_map(|entry| entry.get("document"))
                .map(decode_document)
                .collect::<AppResult<Vec<_>>>()
        });
        Self::log_operation("query", collection.as_str(), result.is_ok(), started);
        result
    }

    #[instrument(skip(self, fields), fields(%collection))]
    async fn add(&self, collection: &CollectionPath, fields: Fields) -> AppResult<String> {
        let started = Instant::now();
        let request = self
            .client
            .post(format!("{}/{collection}", self.documents_root))
            .json(&json!({ "fields": encode_fields(&fields) }));
        let result = Self::json_body(self.send(request).await?)
            .await
            .and_then(|body| decode_document(&body))
            .map(|doc| doc.id);
        Self::log_operation("add", collection.as_str(), result.is_ok(), started);
        result
    }

    #[instrument(skip(self, fields), fields(%path))]
    async fn set(&self, path: &DocumentPath, fields: Fields) -> AppResult<()> {
        let started = Instant::now();
        let request = self
            .client
            .patch(self.document_url(path))
            .json(&json!({ "fields": encode_fields(&fields) }));
        let result = Self::json_body(self.send(request).await?).await.map(|_| ());
        Self::log_operation("set", &path.to_string(), result.is_ok(), started);
        result
    }

    #[instrument(skip(self, fields), fields(%path))]
    async fn update(&self, path: &DocumentPath, fields: Fields) -> AppResult<()> {
        let started = Instant::now();
        let mut params: Vec<(&str, &str)> = fields
            .keys()
            .map(|name| ("updateMask.fieldPaths", name.as_str()))
            .collect();
        params.push(("currentDocument.exists", "true"));

        let request = self
            .client
            .patch(self.document_url(path))
            .query(&params)
            .json(&json!({ "fields": encode_fields(&fields) }));
        let result = Self::json_body(self.send(request).await?).await.map(|_| ());
        Self::log_operation("update", &path.to_string(), result.is_ok(), started);
        result
    }

    async fn subscribe_collection(
        &self,
        collection: &CollectionPath,
    ) -> AppResult<CollectionSubscription> {
        let initial = self.query(collection, None).await?;
        let (sender, receiver) = mpsc::unbounded_channel();
        let _ = sender.send(initial.clone());

        let target = collection.clone();
        self.spawn_poller(sender, initial, move |store| {
            let target = target.clone();
            async move { store.query(&target, None).await }
        });
        Ok(Subscription::new(receiver, collection.as_str()))
    }

    async fn subscribe_document(&self, path: &DocumentPath) -> AppResult<DocumentSubscription> {
        let initial = self.get(path).await?;
        let (sender, receiver) = mpsc::unbounded_channel();
        let _ = sender.send(initial.clone());

        let target = path.clone();
        self.spawn_poller(sender, initial, move |store| {
            let target = target.clone();
            async move { store.get(&target).await }
        });
        Ok(Subscription::new(receiver, path.to_string()))
    }
}
