// ABOUTME: Client-side view state: selection store, recipe list, and recipe details
// ABOUTME: Pure transitions owned by the caller, with live feedback applied on top
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Live feedback for the selected recipe
pub mod details;
/// Matched-recipe list with stale-fetch protection
pub mod recipe_list;
/// Selected ingredients and recipe
pub mod selection;

pub use details::{DetailsView, RecipeDetailsSession};
pub use recipe_list::{FetchTicket, RecipeListState, RecipeListView};
pub use selection::{reduce, Action, SelectionState, SelectionStore};
