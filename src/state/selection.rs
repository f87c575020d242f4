// ABOUTME: Session-wide selection state: chosen ingredients and the recipe being viewed
// ABOUTME: Closed action set with a pure reducer and an owned, injectable store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Selection Store
//!
//! Every screen reads the same [`SelectionState`]. It only changes through
//! [`Action`]s run by [`reduce`], which is pure and total: each call returns a
//! new state and never fails. Side effects (fetching, subscribing) live
//! outside, in the services that dispatch into the store.
//!
//! ```rust
//! use cook_ai::state::{Action, SelectionStore};
//!
//! let mut store = SelectionStore::new();
//! store.dispatch(Action::ToggleIngredient("egg".to_owned()));
//! store.dispatch(Action::ToggleIngredient("milk".to_owned()));
//! store.dispatch(Action::RemoveIngredient(0));
//! assert_eq!(store.state().selected_ingredients, ["milk"]);
//! ```

use tracing::trace;

use crate::models::{Comment, Rating, Recipe};

/// Ingredients the user picked and the recipe they are looking at
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionState {
    /// Ingredient names in insertion order, without duplicates
    pub selected_ingredients: Vec<String>,
    /// Recipe currently open in the details view
    pub selected_recipe: Option<Recipe>,
}

impl SelectionState {
    /// Whether `name` is currently selected
    #[must_use]
    pub fn is_selected(&self, name: &str) -> bool {
        self.selected_ingredients.iter().any(|n| n == name)
    }

    /// Id of the open recipe
    #[must_use]
    pub fn selected_recipe_id(&self) -> Option<&str> {
        self.selected_recipe.as_ref().map(|r| r.id.as_str())
    }
}

/// Every way the selection can change
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Add the ingredient if absent, remove it if present; an empty name is ignored
    ToggleIngredient(String),
    /// Remove the ingredient at this position; out of range is ignored
    RemoveIngredient(usize),
    /// Replace the open recipe
    SelectRecipe(Recipe),
    /// Back to the initial state
    ClearAll,
    /// Replace the open recipe's ratings; ignored when none is open
    UpdateRatings(Vec<Rating>),
    /// Replace the open recipe's comments; ignored when none is open
    UpdateComments(Vec<Comment>),
}

/// Compute the state that follows `state` under `action`
#[must_use]
pub fn reduce(state: &SelectionState, action: Action) -> SelectionState {
    match action {
        Action::ToggleIngredient(name) => {
            if name.is_empty() {
                return state.clone();
            }
            let mut selected_ingredients = state.selected_ingredients.clone();
            if let Some(pos) = selected_ingredients.iter().position(|n| *n == name) {
                selected_ingredients.remove(pos);
            } else {
                selected_ingredients.push(name);
            }
            SelectionState {
                selected_ingredients,
                ..state.clone()
            }
        }
        Action::RemoveIngredient(index) => {
            let mut selected_ingredients = state.selected_ingredients.clone();
            if index < selected_ingredients.len() {
                selected_ingredients.remove(index);
            }
            SelectionState {
                selected_ingredients,
                ..state.clone()
            }
        }
        Action::SelectRecipe(recipe) => SelectionState {
            selected_recipe: Some(recipe),
            ..state.clone()
        },
        Action::ClearAll => SelectionState::default(),
        Action::UpdateRatings(ratings) => patch_recipe(state, |recipe| recipe.ratings = ratings),
        Action::UpdateComments(comments) => {
            patch_recipe(state, |recipe| recipe.comments = comments)
        }
    }
}

fn patch_recipe(state: &SelectionState, patch: impl FnOnce(&mut Recipe)) -> SelectionState {
    let mut next = state.clone();
    if let Some(recipe) = next.selected_recipe.as_mut() {
        patch(recipe);
    }
    next
}

/// Owned container for the session's selection
///
/// Single writer: dispatching needs `&mut self`, so whoever owns the store
/// decides who may change it.
#[derive(Debug, Default)]
pub struct SelectionStore {
    state: SelectionState,
}

impl SelectionStore {
    /// Store in the initial (empty) state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Apply an action
    pub fn dispatch(&mut self, action: Action) {
        trace!(?action, "Dispatching selection action");
        self.state = reduce(&self.state, action);
    }
}
