// ABOUTME: Document models for ingredients, recipes, feedback, and user profiles
// ABOUTME: Field names follow the camelCase layout stored in the document backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Rating and comment records attached to recipes
pub mod feedback;
/// Ingredient and recipe documents
pub mod recipe;
/// Authenticated identity and per-user profile document
pub mod user;

pub use feedback::{Comment, Rating};
pub use recipe::{Ingredient, Recipe, RecipeOfTheMonth};
pub use user::{UserIdentity, UserProfile};
