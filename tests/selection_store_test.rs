// ABOUTME: Integration tests for the selection store and its reducer
// ABOUTME: Toggle, remove, select, clear, and feedback replacement semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use cook_ai::models::{Comment, Rating, Recipe};
use cook_ai::state::{reduce, Action, SelectionState, SelectionStore};

use common::recipe;

fn toggle(name: &str) -> Action {
    Action::ToggleIngredient(name.to_owned())
}

#[test]
fn test_toggling_egg_twice_returns_to_empty() {
    let mut store = SelectionStore::new();
    store.dispatch(toggle("egg"));
    assert_eq!(store.state().selected_ingredients, ["egg"]);
    store.dispatch(toggle("egg"));
    assert!(store.state().selected_ingredients.is_empty());
}

#[test]
fn test_toggle_preserves_insertion_order() {
    let mut store = SelectionStore::new();
    for name in ["flour", "egg", "milk", "egg", "sugar"] {
        store.dispatch(toggle(name));
    }
    assert_eq!(store.state().selected_ingredients, ["flour", "milk", "sugar"]);
    assert!(store.state().is_selected("milk"));
    assert!(!store.state().is_selected("egg"));
}

#[test]
fn test_remove_by_index_leaves_other_entries() {
    let mut store = SelectionStore::new();
    for name in ["flour", "egg", "milk"] {
        store.dispatch(toggle(name));
    }
    store.dispatch(Action::RemoveIngredient(1));
    assert_eq!(store.state().selected_ingredients, ["flour", "milk"]);
    store.dispatch(Action::RemoveIngredient(7));
    assert_eq!(store.state().selected_ingredients, ["flour", "milk"]);
}

#[test]
fn test_update_ratings_replaces_only_ratings() {
    let mut original = recipe("r1", &["egg", "flour", "milk"]);
    original.comments = vec![Comment {
        uid: "u9".to_owned(),
        username: Some("Deniz".to_owned()),
        comment: "Lovely".to_owned(),
    }];

    let mut store = SelectionStore::new();
    store.dispatch(Action::SelectRecipe(original.clone()));
    let ratings = vec![
        Rating {
            uid: "u1".to_owned(),
            username: None,
            rating: 4,
        },
        Rating {
            uid: "u2".to_owned(),
            username: Some("Ece".to_owned()),
            rating: 2,
        },
    ];
    store.dispatch(Action::UpdateRatings(ratings.clone()));

    let selected = store.state().selected_recipe.clone().unwrap();
    assert_eq!(selected.ratings, ratings);
    assert_eq!(
        selected,
        Recipe {
            ratings,
            ..original
        }
    );
}

#[test]
fn test_update_comments_without_selection_is_ignored() {
    let mut store = SelectionStore::new();
    store.dispatch(toggle("egg"));
    let before = store.state().clone();
    store.dispatch(Action::UpdateComments(vec![Comment {
        uid: "u1".to_owned(),
        username: None,
        comment: "Hi".to_owned(),
    }]));
    assert_eq!(store.state(), &before);
}

#[test]
fn test_clear_all_always_yields_initial_state() {
    let mut state = SelectionState::default();
    for action in [
        toggle("egg"),
        toggle("milk"),
        Action::SelectRecipe(recipe("r2", &["egg"])),
        Action::UpdateRatings(Vec::new()),
    ] {
        state = reduce(&state, action);
        assert_eq!(reduce(&state, Action::ClearAll), SelectionState::default());
    }
}

#[test]
fn test_select_recipe_replaces_previous_selection() {
    let mut store = SelectionStore::new();
    store.dispatch(Action::SelectRecipe(recipe("r1", &["egg"])));
    store.dispatch(Action::SelectRecipe(recipe("r2", &["milk"])));
    assert_eq!(store.state().selected_recipe_id(), Some("r2"));
}
