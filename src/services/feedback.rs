// ABOUTME: Rating and comment submission with one record per user per recipe
// ABOUTME: Looks up the caller's existing record by uid to choose insert or update
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{info, instrument};

use crate::backend::{encode, CollectionPath, DocumentStore, FieldFilter, Fields};
use crate::constants::feedback::{MAX_RATING, MIN_RATING};
use crate::constants::{collections, fields};
use crate::errors::{AppError, AppResult};
use crate::models::{Comment, Rating, UserIdentity};

const LOGIN_REQUIRED: &str = "You must be logged in to rate and comment on a recipe.";

/// Whether an upsert created a record or changed an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record existed for the user
    Inserted,
    /// The user's record was updated in place
    Updated,
}

/// Writes ratings and comments under `recipes/{id}`
#[derive(Clone)]
pub struct FeedbackService {
    store: Arc<dyn DocumentStore>,
}

impl FeedbackService {
    /// Service backed by `store`
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Record `user`'s rating of a recipe, replacing any earlier rating
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` without a user, `ValueOutOfRange` for a rating
    /// outside 1..=5, or the backend's error.
    #[instrument(skip(self, user))]
    pub async fn rate(
        &self,
        user: Option<&UserIdentity>,
        recipe_id: &str,
        rating: u8,
    ) -> AppResult<UpsertOutcome> {
        let user = user.ok_or_else(|| AppError::auth_required(LOGIN_REQUIRED))?;
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(AppError::out_of_range(format!(
                "Rating must be between {MIN_RATING} and {MAX_RATING}."
            )));
        }
        let record = Rating {
            uid: user.uid.clone(),
            username: user.attribution_name(),
            rating,
        };
        self.upsert(
            recipe_id,
            collections::RATINGS,
            &user.uid,
            encode(&record)?,
            single_field(fields::RATING, json!(rating)),
        )
        .await
    }

    /// Record `user`'s comment on a recipe, replacing any earlier comment
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` without a user, `InvalidInput` for a blank
    /// comment, or the backend's error.
    #[instrument(skip(self, user, comment))]
    pub async fn comment(
        &self,
        user: Option<&UserIdentity>,
        recipe_id: &str,
        comment: &str,
    ) -> AppResult<UpsertOutcome> {
        let user = user.ok_or_else(|| AppError::auth_required(LOGIN_REQUIRED))?;
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(AppError::invalid_input("Comment cannot be empty."));
        }
        let record = Comment {
            uid: user.uid.clone(),
            username: user.attribution_name(),
            comment: comment.to_owned(),
        };
        self.upsert(
            recipe_id,
            collections::COMMENTS,
            &user.uid,
            encode(&record)?,
            single_field(fields::COMMENT, json!(comment)),
        )
        .await
    }

    /// Save a rating and, when not blank, a comment in one go
    ///
    /// The rating is written first; a rejected rating leaves the comment
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`Self::rate`] or [`Self::comment`].
    pub async fn submit(
        &self,
        user: Option<&UserIdentity>,
        recipe_id: &str,
        rating: u8,
        comment: Option<&str>,
    ) -> AppResult<()> {
        self.rate(user, recipe_id, rating).await?;
        if let Some(comment) = comment.filter(|c| !c.trim().is_empty()) {
            self.comment(user, recipe_id, comment).await?;
        }
        Ok(())
    }

    async fn upsert(
        &self,
        recipe_id: &str,
        sub_collection: &str,
        uid: &str,
        record: Fields,
        changes: Fields,
    ) -> AppResult<UpsertOutcome> {
        let collection = CollectionPath::root(collections::RECIPES)
            .doc(recipe_id)
            .collection(sub_collection);
        let filter = FieldFilter::equal(fields::UID, uid);
        let existing = self.store.query(&collection, Some(&filter)).await?;

        let outcome = if let Some(doc) = existing.first() {
            self.store.update(&collection.doc(doc.id.clone()), changes).await?;
            UpsertOutcome::Updated
        } else {
            self.store.add(&collection, record).await?;
            UpsertOutcome::Inserted
        };
        info!(%collection, uid, ?outcome, "Saved feedback");
        Ok(outcome)
    }
}

fn single_field(name: &str, value: Value) -> Fields {
    let mut changes = Map::new();
    changes.insert(name.to_owned(), value);
    changes
}
