// ABOUTME: Domain services over the document backend
// ABOUTME: Recipe catalog, feedback upserts, saved recipes, and user profiles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Each service holds a shared handle to the [`DocumentStore`] and takes the
//! signed-in identity per call. Operations that need a user fail with
//! `AuthRequired` when given `None`.

/// Rating and comment upserts
pub mod feedback;
/// Body metrics and BMI
pub mod profile;
/// Ingredient and recipe reads
pub mod recipes;
/// Saved-recipe list
pub mod saved;

pub use feedback::{FeedbackService, UpsertOutcome};
pub use profile::{ProfileService, ProfileSubscription};
pub use recipes::RecipeCatalog;
pub use saved::{SavedRecipes, SavedRecipesSubscription};

use crate::backend::{CollectionPath, DocumentPath};
use crate::constants::collections;

fn user_path(uid: &str) -> DocumentPath {
    CollectionPath::root(collections::USERS).doc(uid)
}
