// ABOUTME: Saved-recipe list kept on the user's profile document
// ABOUTME: Toggle membership by recipe id and follow the list live
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, instrument};

use super::profile::{profile_from, ProfileSubscription, ProfileService};
use super::user_path;
use crate::backend::{encode, DocumentStore};
use crate::constants::fields;
use crate::errors::{AppError, AppResult};
use crate::models::{Recipe, UserIdentity, UserProfile};

const LOGIN_REQUIRED: &str = "You must be logged in to save a recipe.";

/// Live view of the saved-recipe list
pub struct SavedRecipesSubscription {
    profile: ProfileSubscription,
}

impl SavedRecipesSubscription {
    /// Wait for the next snapshot of the list
    pub async fn next(&mut self) -> Option<Vec<Recipe>> {
        self.profile.next().await.map(|profile| profile.saved_recipes)
    }

    /// Stop receiving snapshots
    pub fn unsubscribe(self) {
        self.profile.unsubscribe();
    }
}

/// Reads and toggles `users/{uid}.savedRecipes`
#[derive(Clone)]
pub struct SavedRecipes {
    store: Arc<dyn DocumentStore>,
}

impl SavedRecipes {
    /// Service backed by `store`
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Whether `recipe_id` is in the user's list
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` without a user or the backend's error.
    pub async fn is_saved(&self, user: Option<&UserIdentity>, recipe_id: &str) -> AppResult<bool> {
        Ok(self.saved_recipes(user).await?.iter().any(|r| r.id == recipe_id))
    }

    /// Remove the recipe if saved, append it otherwise; returns the new state
    ///
    /// Entries are matched by `id` on the stored array, so other entries are
    /// written back exactly as read even when they would not decode. A user
    /// without a profile document gets one holding just this recipe.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` without a user, `SerializationError` when
    /// `savedRecipes` is present but not an array, or the backend's error.
    #[instrument(skip(self, user, recipe), fields(recipe_id = %recipe.id))]
    pub async fn toggle_saved(&self, user: Option<&UserIdentity>, recipe: &Recipe) -> AppResult<bool> {
        let user = user.ok_or_else(|| AppError::auth_required(LOGIN_REQUIRED))?;
        if recipe.id.is_empty() {
            return Err(AppError::invalid_input("Cannot save a recipe without an id."));
        }
        let path = user_path(&user.uid);
        let Some(doc) = self.store.get(&path).await? else {
            let profile = UserProfile {
                saved_recipes: vec![recipe.clone()],
                ..UserProfile::default()
            };
            self.store.set(&path, encode(&profile)?).await?;
            info!(uid = %user.uid, "Created profile with first saved recipe");
            return Ok(true);
        };

        let mut entries = match doc.fields.get(fields::SAVED_RECIPES) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) => entries.clone(),
            Some(_) => {
                return Err(AppError::serialization(format!(
                    "{} on users/{} is not a list",
                    fields::SAVED_RECIPES,
                    user.uid
                )))
            }
        };
        let before = entries.len();
        entries.retain(|entry| entry.get("id").and_then(Value::as_str) != Some(recipe.id.as_str()));
        let now_saved = entries.len() == before;
        if now_saved {
            entries.push(serde_json::to_value(recipe)?);
        }

        let mut changes = Map::new();
        changes.insert(fields::SAVED_RECIPES.to_owned(), Value::Array(entries));
        self.store.update(&path, changes).await?;
        info!(uid = %user.uid, now_saved, "Toggled saved recipe");
        Ok(now_saved)
    }

    /// The user's saved recipes in the order they were saved
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` without a user or the backend's error.
    pub async fn saved_recipes(&self, user: Option<&UserIdentity>) -> AppResult<Vec<Recipe>> {
        let user = user.ok_or_else(|| AppError::auth_required(LOGIN_REQUIRED))?;
        let doc = self.store.get(&user_path(&user.uid)).await?;
        Ok(profile_from(doc.as_ref()).saved_recipes)
    }

    /// Follow the saved-recipe list
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` without a user or the backend's error.
    pub async fn subscribe_saved(&self, user: Option<&UserIdentity>) -> AppResult<SavedRecipesSubscription> {
        let user = user.ok_or_else(|| AppError::auth_required(LOGIN_REQUIRED))?;
        let profile = ProfileService::new(Arc::clone(&self.store))
            .subscribe_profile(Some(user))
            .await?;
        Ok(SavedRecipesSubscription { profile })
    }
}
