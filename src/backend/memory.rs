// ABOUTME: In-memory document backend with synchronous change notification
// ABOUTME: Used by tests, benches, and local development without a Firebase project
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use super::{
    CollectionPath, CollectionSubscription, Document, DocumentPath, DocumentStore,
    DocumentSubscription, FieldFilter, Fields, Subscription,
};
use crate::errors::{AppError, AppResult};

/// Length of generated document ids
const GENERATED_ID_LEN: usize = 20;

#[derive(Default)]
struct MemoryState {
    collections: BTreeMap<CollectionPath, Vec<Document>>,
    collection_watchers: Vec<(CollectionPath, mpsc::UnboundedSender<Vec<Document>>)>,
    document_watchers: Vec<(DocumentPath, mpsc::UnboundedSender<Option<Document>>)>,
}

impl MemoryState {
    fn snapshot(&self, collection: &CollectionPath) -> Vec<Document> {
        self.collections.get(collection).cloned().unwrap_or_default()
    }

    fn find(&self, path: &DocumentPath) -> Option<Document> {
        self.collections
            .get(path.parent())?
            .iter()
            .find(|doc| doc.id == path.id())
            .cloned()
    }

    /// Push fresh snapshots to every watcher of `path` or its collection
    ///
    /// Watchers whose receiving side is gone are dropped on every write,
    /// whatever path they watch.
    fn notify(&mut self, path: &DocumentPath) {
        let collection_snapshot = self.snapshot(path.parent());
        let document_snapshot = self.find(path);

        self.collection_watchers.retain(|(watched, sender)| {
            !sender.is_closed()
                && (watched != path.parent() || sender.send(collection_snapshot.clone()).is_ok())
        });
        self.document_watchers.retain(|(watched, sender)| {
            !sender.is_closed()
                && (watched != path || sender.send(document_snapshot.clone()).is_ok())
        });
    }
}

/// Document backend held entirely in memory
///
/// Writes notify subscribers before the write call returns, so tests can
/// observe pushes deterministically. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live subscriptions still attached
    pub async fn active_subscriptions(&self) -> usize {
        let mut state = self.state.write().await;
        state.collection_watchers.retain(|(_, sender)| !sender.is_closed());
        state.document_watchers.retain(|(_, sender)| !sender.is_closed());
        state.collection_watchers.len() + state.document_watchers.len()
    }

    fn generate_id() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(GENERATED_ID_LEN)
            .map(char::from)
            .collect()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, path: &DocumentPath) -> AppResult<Option<Document>> {
        Ok(self.state.read().await.find(path))
    }

    async fn query(
        &self,
        collection: &CollectionPath,
        filter: Option<&FieldFilter>,
    ) -> AppResult<Vec<Document>> {
        let state = self.state.read().await;
        let docs = state.collections.get(collection).map_or_else(Vec::new, |docs| {
            docs.iter()
                .filter(|doc| filter.is_none_or(|f| f.matches(&doc.fields)))
                .cloned()
                .collect()
        });
        Ok(docs)
    }

    async fn add(&self, collection: &CollectionPath, fields: Fields) -> AppResult<String> {
        let id = Self::generate_id();
        let path = collection.doc(id.clone());
        let mut state = self.state.write().await;
        state
            .collections
            .entry(collection.clone())
            .or_default()
            .push(Document::new(id.clone(), fields));
        state.notify(&path);
        debug!(%path, "Inserted document");
        Ok(id)
    }

    async fn set(&self, path: &DocumentPath, fields: Fields) -> AppResult<()> {
        let mut state = self.state.write().await;
        let docs = state.collections.entry(path.parent().clone()).or_default();
        match docs.iter_mut().find(|doc| doc.id == path.id()) {
            Some(existing) => existing.fields = fields,
            None => docs.push(Document::new(path.id().to_owned(), fields)),
        }
        state.notify(path);
        Ok(())
    }

    async fn update(&self, path: &DocumentPath, fields: Fields) -> AppResult<()> {
        let mut state = self.state.write().await;
        let existing = state
            .collections
            .get_mut(path.parent())
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == path.id()))
            .ok_or_else(|| AppError::not_found(format!("Document {path}")))?;
        existing.fields.extend(fields);
        state.notify(path);
        Ok(())
    }

    async fn subscribe_collection(
        &self,
        collection: &CollectionPath,
    ) -> AppResult<CollectionSubscription> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut state = self.state.write().await;
        // Receiver is alive here, the initial send cannot fail
        let _ = sender.send(state.snapshot(collection));
        state.collection_watchers.push((collection.clone(), sender));
        Ok(Subscription::new(receiver, collection.as_str()))
    }

    async fn subscribe_document(&self, path: &DocumentPath) -> AppResult<DocumentSubscription> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut state = self.state.write().await;
        let _ = sender.send(state.find(path));
        state.document_watchers.push((path.clone(), sender));
        Ok(Subscription::new(receiver, path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::backend::encode;
    use crate::errors::ErrorCode;

    fn fields(value: &serde_json::Value) -> Fields {
        encode(value).unwrap()
    }

    #[tokio::test]
    async fn test_add_get_update() {
        let store = InMemoryDocumentStore::new();
        let ratings = CollectionPath::root("recipes").doc("r1").collection("ratings");

        let id = store
            .add(&ratings, fields(&json!({"uid": "u1", "rating": 4})))
            .await
            .unwrap();
        assert_eq!(id.len(), GENERATED_ID_LEN);

        store
            .update(&ratings.doc(id.clone()), fields(&json!({"rating": 5})))
            .await
            .unwrap();
        let doc = store.get(&ratings.doc(id)).await.unwrap().unwrap();
        assert_eq!(doc.fields["rating"], json!(5));
        assert_eq!(doc.fields["uid"], json!("u1"));
    }

    #[tokio::test]
    async fn test_update_missing_document_fails() {
        let store = InMemoryDocumentStore::new();
        let path = CollectionPath::root("users").doc("ghost");
        let err = store.update(&path, Fields::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ResourceNotFound);
    }

    #[tokio::test]
    async fn test_subscription_receives_initial_and_pushed_snapshots() {
        let store = InMemoryDocumentStore::new();
        let comments = CollectionPath::root("recipes").doc("r1").collection("comments");
        let mut sub = store.subscribe_collection(&comments).await.unwrap();
        assert_eq!(sub.next().await.unwrap().len(), 0);

        store
            .add(&comments, fields(&json!({"uid": "u1", "comment": "nice"})))
            .await
            .unwrap();
        assert_eq!(sub.next().await.unwrap().len(), 1);

        // Writes elsewhere do not reach this subscription
        store
            .add(&CollectionPath::root("ingredients"), fields(&json!({"name": "egg"})))
            .await
            .unwrap();
        assert!(sub.latest().is_none());
    }

    #[tokio::test]
    async fn test_unsubscribe_detaches_watcher() {
        let store = InMemoryDocumentStore::new();
        let user = CollectionPath::root("users").doc("u1");
        let sub = store.subscribe_document(&user).await.unwrap();
        assert_eq!(store.active_subscriptions().await, 1);

        sub.unsubscribe();
        store.set(&user, fields(&json!({"height": 180}))).await.unwrap();
        assert_eq!(store.active_subscriptions().await, 0);
    }

    #[tokio::test]
    async fn test_any_write_drops_closed_watchers() {
        let store = InMemoryDocumentStore::new();
        let quiet = CollectionPath::root("recipes").doc("r1").collection("ratings");
        let ratings = store.subscribe_collection(&quiet).await.unwrap();
        let profile = store
            .subscribe_document(&CollectionPath::root("users").doc("u1"))
            .await
            .unwrap();
        ratings.unsubscribe();
        profile.unsubscribe();

        store
            .add(&CollectionPath::root("ingredients"), fields(&json!({"name": "egg"})))
            .await
            .unwrap();
        let remaining = {
            let state = store.state.read().await;
            state.collection_watchers.len() + state.document_watchers.len()
        };
        assert_eq!(remaining, 0);
    }
}
