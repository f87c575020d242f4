// ABOUTME: Read path over ingredients and recipes: listing, search, matching, featured picks
// ABOUTME: Chunks "array contains any" queries and loads each recipe's feedback alongside it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Recipe Catalog
//!
//! Reads ingredients and recipes from the document backend and turns a set of
//! selected ingredient names into a ranked list of recipes.
//!
//! Matching runs in two steps. The backend narrows the candidates to recipes
//! sharing at least one selected ingredient (one query per 30 names, the
//! backend's limit for "array contains any"), then the in-process matcher keeps
//! recipes sharing at least three and ranks them.

use std::collections::HashSet;
use std::sync::Arc;

use cook_ai_intelligence::rank_recipes;
use futures_util::future::{try_join, try_join_all};
use rand::seq::SliceRandom;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::backend::{decode_all, CollectionPath, Document, DocumentPath, DocumentStore, FieldFilter};
use crate::constants::matching::MAX_ANY_OF_VALUES;
use crate::constants::{collections, fields};
use crate::errors::AppResult;
use crate::models::{Comment, Ingredient, Rating, Recipe, RecipeOfTheMonth};

/// Read-only access to ingredients and recipes
#[derive(Clone)]
pub struct RecipeCatalog {
    store: Arc<dyn DocumentStore>,
}

impl RecipeCatalog {
    /// Catalog backed by `store`
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// All reference ingredients, ordered by name ignoring case
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    #[instrument(skip(self))]
    pub async fn list_ingredients(&self) -> AppResult<Vec<Ingredient>> {
        let docs = self
            .store
            .query(&CollectionPath::root(collections::INGREDIENTS), None)
            .await?;
        let mut ingredients: Vec<Ingredient> = decode_all(&docs);
        ingredients.sort_by_cached_key(|ingredient| ingredient.name.to_lowercase());
        Ok(ingredients)
    }

    /// Ingredients whose name contains `term`, ignoring case
    ///
    /// A blank term matches everything.
    #[must_use]
    pub fn search_ingredients<'a>(ingredients: &'a [Ingredient], term: &str) -> Vec<&'a Ingredient> {
        let needle = term.trim().to_lowercase();
        ingredients
            .iter()
            .filter(|ingredient| ingredient.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Recipes using at least three of `selected`, best matches first
    ///
    /// # Errors
    ///
    /// Returns an error if any backend read fails.
    #[instrument(skip(self), fields(selected = selected.len()))]
    pub async fn find_matching_recipes(&self, selected: &[String]) -> AppResult<Vec<Recipe>> {
        if selected.is_empty() {
            return Ok(Vec::new());
        }

        let recipes = CollectionPath::root(collections::RECIPES);
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for chunk in selected.chunks(MAX_ANY_OF_VALUES) {
            let values = chunk.iter().cloned().map(Value::from).collect();
            let filter = FieldFilter::array_contains_any(fields::INGREDIENTS, values);
            for doc in self.store.query(&recipes, Some(&filter)).await? {
                if seen.insert(doc.id.clone()) {
                    candidates.extend(decode_recipe(&doc));
                }
            }
        }
        debug!(candidates = candidates.len(), "Fetched candidate recipes");

        let candidates =
            try_join_all(candidates.into_iter().map(|recipe| self.with_feedback(recipe))).await?;
        Ok(rank_recipes(candidates, selected))
    }

    /// One recipe with its feedback, `None` if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    #[instrument(skip(self))]
    pub async fn load_recipe(&self, recipe_id: &str) -> AppResult<Option<Recipe>> {
        let path = recipe_path(recipe_id);
        let Some(doc) = self.store.get(&path).await? else {
            return Ok(None);
        };
        let mut recipe: Recipe = doc.decode()?;
        recipe.id = doc.id;
        self.with_feedback(recipe).await.map(Some)
    }

    /// The featured recipe named by the first `recipeofthemonth` document
    ///
    /// A missing pointer, a malformed pointer, or a pointer to a recipe that no
    /// longer exists all yield `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    #[instrument(skip(self))]
    pub async fn recipe_of_the_month(&self) -> AppResult<Option<Recipe>> {
        let docs = self
            .store
            .query(&CollectionPath::root(collections::RECIPE_OF_THE_MONTH), None)
            .await?;
        let Some(pointer) = docs.first() else {
            info!("No recipe of the month is set");
            return Ok(None);
        };
        let pointer: RecipeOfTheMonth = match pointer.decode() {
            Ok(pointer) => pointer,
            Err(e) => {
                warn!("Unreadable recipe of the month: {e}");
                return Ok(None);
            }
        };
        let recipe = self.load_recipe(&pointer.recipe_id).await?;
        if recipe.is_none() {
            warn!(recipe_id = %pointer.recipe_id, "Recipe of the month points at a missing recipe");
        }
        Ok(recipe)
    }

    /// `count` recipes picked at random
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    #[instrument(skip(self))]
    pub async fn random_suggestions(&self, count: usize) -> AppResult<Vec<Recipe>> {
        let docs = self
            .store
            .query(&CollectionPath::root(collections::RECIPES), None)
            .await?;
        let mut recipes: Vec<Recipe> = docs.iter().filter_map(decode_recipe).collect();
        recipes.shuffle(&mut rand::thread_rng());
        recipes.truncate(count);
        Ok(recipes)
    }

    async fn with_feedback(&self, mut recipe: Recipe) -> AppResult<Recipe> {
        let path = recipe_path(&recipe.id);
        let ratings_path = path.collection(collections::RATINGS);
        let comments_path = path.collection(collections::COMMENTS);
        let (ratings, comments) = try_join(
            self.store.query(&ratings_path, None),
            self.store.query(&comments_path, None),
        )
        .await?;
        recipe.ratings = decode_all::<Rating>(&ratings);
        recipe.comments = decode_all::<Comment>(&comments);
        Ok(recipe)
    }
}

fn recipe_path(recipe_id: &str) -> DocumentPath {
    CollectionPath::root(collections::RECIPES).doc(recipe_id)
}

fn decode_recipe(doc: &Document) -> Option<Recipe> {
    match doc.decode::<Recipe>() {
        Ok(recipe) => Some(Recipe {
            id: doc.id.clone(),
            ..recipe
        }),
        Err(e) => {
            warn!(id = %doc.id, "Skipping malformed recipe: {e}");
            None
        }
    }
}
