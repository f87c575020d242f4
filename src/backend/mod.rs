// ABOUTME: Document backend abstraction with pluggable implementations (in-memory, Firestore)
// ABOUTME: Point reads, filtered queries, inserts, updates, and live subscriptions with disposers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Document Backend
//!
//! Every piece of persisted data (ingredients, recipes, feedback, user profiles)
//! lives in an external document database. This module defines the small
//! contract the rest of the crate needs from it:
//!
//! - point read of a document
//! - collection query with an optional equality or "array contains any" filter
//! - insert with a generated id, full set, and partial update
//! - live subscription to a collection or a document
//!
//! Live subscriptions deliver **full snapshots**. The first snapshot arrives
//! immediately; later ones arrive whenever the target changes. Consumers only
//! ever replace their cached copy with the newest snapshot, so no merge logic is
//! needed. Calling [`Subscription::unsubscribe`] (or dropping the handle) is the
//! disposer: the backend stops delivering once the receiving side is closed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cook_ai::backend::{CollectionPath, DocumentStore, FieldFilter};
//! use cook_ai::backend::memory::InMemoryDocumentStore;
//! use serde_json::json;
//!
//! # async fn example() -> cook_ai::errors::AppResult<()> {
//! let store = InMemoryDocumentStore::new();
//! let recipes = CollectionPath::root("recipes");
//! let filter = FieldFilter::array_contains_any("ingredients", vec![json!("egg")]);
//! let docs = store.query(&recipes, Some(&filter)).await?;
//! println!("{} recipes use eggs", docs.len());
//! # Ok(())
//! # }
//! ```

/// Firestore REST backend
pub mod firestore;
/// In-memory backend for tests and offline development
pub mod memory;

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};

/// Field map of a document
pub type Fields = Map<String, Value>;

// ============================================================================
// Paths
// ============================================================================

/// Slash-separated path of a collection (`recipes`, `recipes/r1/ratings`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// Top-level collection
    #[must_use]
    pub fn root(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// Path of a document inside this collection
    #[must_use]
    pub fn doc(&self, id: impl Into<String>) -> DocumentPath {
        DocumentPath {
            collection: self.clone(),
            id: id.into(),
        }
    }

    /// Last path segment, the collection id
    #[must_use]
    pub fn collection_id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Document owning this sub-collection, `None` for top-level collections
    #[must_use]
    pub fn parent(&self) -> Option<DocumentPath> {
        let (parent, _) = self.0.rsplit_once('/')?;
        let (collection, id) = parent.rsplit_once('/')?;
        Some(Self(collection.to_owned()).doc(id))
    }

    /// Full path string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path of a single document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    collection: CollectionPath,
    id: String,
}

impl DocumentPath {
    /// Collection holding this document
    #[must_use]
    pub const fn parent(&self) -> &CollectionPath {
        &self.collection
    }

    /// Document id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Sub-collection nested under this document
    #[must_use]
    pub fn collection(&self, name: &str) -> CollectionPath {
        CollectionPath(format!("{self}/{name}"))
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

// ============================================================================
// Documents and filters
// ============================================================================

/// A document snapshot: its id plus its fields
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Document id (last path segment)
    pub id: String,
    /// Field values
    pub fields: Fields,
}

impl Document {
    /// Create a document snapshot
    #[must_use]
    pub const fn new(id: String, fields: Fields) -> Self {
        Self { id, fields }
    }

    /// Decode the fields into a typed model
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the fields do not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_value(Value::Object(self.fields.clone())).map_err(|e| {
            AppError::serialization(format!("Malformed document {}: {e}", self.id)).with_source(e)
        })
    }
}

/// Decode every well-formed document, skipping and logging malformed ones
#[must_use]
pub fn decode_all<T: DeserializeOwned>(documents: &[Document]) -> Vec<T> {
    documents
        .iter()
        .filter_map(|doc| {
            doc.decode()
                .inspect_err(|e| warn!(id = %doc.id, "Skipping document: {e}"))
                .ok()
        })
        .collect()
}

/// Encode a typed model into document fields
///
/// # Errors
///
/// Returns a serialization error if `value` does not serialize to a JSON object.
pub fn encode<T: Serialize>(value: &T) -> AppResult<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(AppError::serialization(format!(
            "Documents must encode to an object, got {other}"
        ))),
    }
}

/// Query filter on a single field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldFilter {
    /// Field equals the value
    Equal {
        /// Field name
        field: String,
        /// Expected value
        value: Value,
    },
    /// Array field contains at least one of the values
    ArrayContainsAny {
        /// Array field name
        field: String,
        /// Candidate values
        values: Vec<Value>,
    },
}

impl FieldFilter {
    /// Equality filter
    #[must_use]
    pub fn equal(field: &str, value: impl Into<Value>) -> Self {
        Self::Equal {
            field: field.to_owned(),
            value: value.into(),
        }
    }

    /// Membership filter over an array field
    #[must_use]
    pub fn array_contains_any(field: &str, values: Vec<Value>) -> Self {
        Self::ArrayContainsAny {
            field: field.to_owned(),
            values,
        }
    }

    /// Evaluate the filter against a document's fields
    #[must_use]
    pub fn matches(&self, fields: &Fields) -> bool {
        match self {
            Self::Equal { field, value } => fields.get(field) == Some(value),
            Self::ArrayContainsAny { field, values } => match fields.get(field) {
                Some(Value::Array(items)) => items.iter().any(|item| values.contains(item)),
                _ => false,
            },
        }
    }
}

// ============================================================================
// Live subscriptions
// ============================================================================

/// Receiving end of a live subscription
///
/// Each received item is an authoritative full snapshot.
pub struct Subscription<T> {
    receiver: mpsc::UnboundedReceiver<T>,
    target: String,
}

/// Live view of a collection
pub type CollectionSubscription = Subscription<Vec<Document>>;

/// Live view of a single document (`None` while it does not exist)
pub type DocumentSubscription = Subscription<Option<Document>>;

impl<T> Subscription<T> {
    /// Wrap a receiver fed by a backend
    #[must_use]
    pub fn new(receiver: mpsc::UnboundedReceiver<T>, target: impl Into<String>) -> Self {
        Self {
            receiver,
            target: target.into(),
        }
    }

    /// Path this subscription watches
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Wait for the next snapshot, `None` once the backend stopped delivering
    pub async fn next(&mut self) -> Option<T> {
        self.receiver.recv().await
    }

    /// Most recent snapshot already delivered, discarding older ones
    ///
    /// Never waits. Returns `None` if nothing new arrived since the last call.
    pub fn latest(&mut self) -> Option<T> {
        let mut latest = None;
        while let Ok(snapshot) = self.receiver.try_recv() {
            latest = Some(snapshot);
        }
        latest
    }

    /// Stop receiving snapshots
    pub fn unsubscribe(mut self) {
        self.receiver.close();
        debug!(target = %self.target, "Unsubscribed from live updates");
    }
}

// ============================================================================
// Backend trait
// ============================================================================

/// Document backend contract
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend name for logs
    fn backend_name(&self) -> &'static str;

    /// Read a single document, `None` if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or the response is malformed.
    async fn get(&self, path: &DocumentPath) -> AppResult<Option<Document>>;

    /// Read all documents of a collection matching an optional filter
    ///
    /// Documents come back in the backend's natural order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or the response is malformed.
    async fn query(
        &self,
        collection: &CollectionPath,
        filter: Option<&FieldFilter>,
    ) -> AppResult<Vec<Document>>;

    /// Insert a document with a generated id and return that id
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected.
    async fn add(&self, collection: &CollectionPath, fields: Fields) -> AppResult<String>;

    /// Create or fully replace a document
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected.
    async fn set(&self, path: &DocumentPath, fields: Fields) -> AppResult<()>;

    /// Overwrite the given fields of an existing document
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the document does not exist, or an error if
    /// the write is rejected.
    async fn update(&self, path: &DocumentPath, fields: Fields) -> AppResult<()>;

    /// Subscribe to full snapshots of a collection
    ///
    /// # Errors
    ///
    /// Returns an error if the initial snapshot cannot be read.
    async fn subscribe_collection(
        &self,
        collection: &CollectionPath,
    ) -> AppResult<CollectionSubscription>;

    /// Subscribe to snapshots of a single document
    ///
    /// # Errors
    ///
    /// Returns an error if the initial snapshot cannot be read.
    async fn subscribe_document(&self, path: &DocumentPath) -> AppResult<DocumentSubscription>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_paths() {
        let ratings = CollectionPath::root("recipes").doc("r1").collection("ratings");
        assert_eq!(ratings.as_str(), "recipes/r1/ratings");
        assert_eq!(ratings.collection_id(), "ratings");

        let parent = ratings.parent().unwrap();
        assert_eq!(parent.to_string(), "recipes/r1");
        assert_eq!(parent.id(), "r1");
        assert!(CollectionPath::root("recipes").parent().is_none());
    }

    #[test]
    fn test_filters() {
        let fields = encode(&json!({"uid": "u1", "ingredients": ["egg", "milk"]})).unwrap();

        assert!(FieldFilter::equal("uid", "u1").matches(&fields));
        assert!(!FieldFilter::equal("uid", "u2").matches(&fields));
        assert!(FieldFilter::array_contains_any("ingredients", vec![json!("salt"), json!("milk")])
            .matches(&fields));
        assert!(!FieldFilter::array_contains_any("ingredients", vec![json!("salt")]).matches(&fields));
        assert!(!FieldFilter::array_contains_any("uid", vec![json!("u1")]).matches(&fields));
    }

    #[test]
    fn test_encode_rejects_non_objects() {
        assert!(encode(&vec![1, 2, 3]).is_err());
    }

    #[tokio::test]
    async fn test_latest_keeps_only_newest_snapshot() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subscription = Subscription::new(rx, "recipes");
        tx.send(1).unwrap();
        tx.send(2).unwrap();
        tx.send(3).unwrap();
        assert_eq!(subscription.latest(), Some(3));
        assert_eq!(subscription.latest(), None);

        subscription.unsubscribe();
        assert!(tx.is_closed());
    }
}
