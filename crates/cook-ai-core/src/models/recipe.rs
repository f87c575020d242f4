// ABOUTME: Ingredient and recipe document models
// ABOUTME: Recipe carries live feedback and the derived matched-ingredient count
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::feedback::{Comment, Rating};

/// Reference ingredient the user can pick from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique ingredient name, also the selection key
    pub name: String,
    /// Image URI
    #[serde(default)]
    pub image: String,
}

/// Recipe document with its feedback loaded alongside
///
/// `ratings` and `comments` live in sub-collections in the backend and are
/// filled in by the catalog after the recipe itself is read.
/// `matched_ingredients` is derived by the matcher and never persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Document id
    #[serde(default)]
    pub id: String,
    /// Display name
    pub name: String,
    /// Image URI
    #[serde(default)]
    pub image: String,
    /// Calories per serving
    #[serde(default)]
    pub calories: f64,
    /// Cooking time in minutes
    #[serde(default)]
    pub cook_time: u32,
    /// Ordered preparation steps
    #[serde(default)]
    pub steps: Vec<String>,
    /// Required ingredient names
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Ratings snapshot
    #[serde(default)]
    pub ratings: Vec<Rating>,
    /// Comments snapshot
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Number of selected ingredients this recipe uses
    #[serde(default, skip_serializing)]
    pub matched_ingredients: usize,
}

impl Recipe {
    /// Whether the recipe lists the given ingredient
    #[must_use]
    pub fn uses(&self, ingredient: &str) -> bool {
        self.ingredients.iter().any(|name| name == ingredient)
    }
}

/// Pointer document naming the featured recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeOfTheMonth {
    /// Id of the featured recipe document
    pub recipe_id: String,
}
