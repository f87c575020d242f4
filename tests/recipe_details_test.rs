// ABOUTME: Integration tests for the live recipe-details session
// ABOUTME: Pushes update the selected recipe; pushes for a deselected recipe are dropped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::time::Duration;

use cook_ai::services::FeedbackService;
use cook_ai::state::{Action, DetailsView, RecipeDetailsSession, SelectionStore};
use tokio::time::timeout;

use common::{identity, memory_store, recipe, seed_rating};

#[tokio::test]
async fn test_initial_snapshot_and_pushes_are_applied() {
    let store = memory_store();
    seed_rating(&store, "r1", "u1", 3).await;

    let mut selection = SelectionStore::new();
    selection.dispatch(Action::SelectRecipe(recipe("r1", &["egg"])));
    let mut session = RecipeDetailsSession::open(&*store, "r1").await.unwrap();

    assert_eq!(session.apply_pending(&mut selection), 2);
    let selected = selection.state().selected_recipe.as_ref().unwrap();
    assert_eq!(selected.ratings.len(), 1);

    let feedback = FeedbackService::new(store.clone());
    feedback
        .comment(Some(&identity("u2", "Ece")), "r1", "Loved it")
        .await
        .unwrap();
    let applied = timeout(Duration::from_secs(1), session.next_update(&mut selection))
        .await
        .unwrap();
    assert!(applied);

    let DetailsView::Recipe {
        average_rating,
        recent_comments,
        ..
    } = DetailsView::from_selection(selection.state())
    else {
        panic!("a recipe is selected");
    };
    assert_eq!(average_rating, Some(3.0));
    assert_eq!(recent_comments.len(), 1);
    assert_eq!(recent_comments[0].author(), "Ece");
    session.close();
}

#[tokio::test]
async fn test_push_after_clear_all_is_ignored() {
    let store = memory_store();
    let mut selection = SelectionStore::new();
    selection.dispatch(Action::SelectRecipe(recipe("r1", &["egg"])));
    let mut session = RecipeDetailsSession::open(&*store, "r1").await.unwrap();
    session.apply_pending(&mut selection);

    selection.dispatch(Action::ClearAll);
    seed_rating(&store, "r1", "u1", 5).await;

    assert_eq!(session.apply_pending(&mut selection), 0);
    assert!(selection.state().selected_recipe.is_none());
    assert_eq!(
        DetailsView::from_selection(selection.state()),
        DetailsView::NoRecipeSelected
    );
}

#[tokio::test]
async fn test_push_for_previous_recipe_does_not_touch_new_one() {
    let store = memory_store();
    let mut selection = SelectionStore::new();
    selection.dispatch(Action::SelectRecipe(recipe("r1", &["egg"])));
    let mut stale = RecipeDetailsSession::open(&*store, "r1").await.unwrap();
    stale.apply_pending(&mut selection);

    selection.dispatch(Action::SelectRecipe(recipe("r2", &["milk"])));
    seed_rating(&store, "r1", "u1", 1).await;

    assert_eq!(stale.apply_pending(&mut selection), 0);
    let selected = selection.state().selected_recipe.as_ref().unwrap();
    assert_eq!(selected.id, "r2");
    assert!(selected.ratings.is_empty());
}

#[tokio::test]
async fn test_close_detaches_both_subscriptions() {
    let store = memory_store();
    let session = RecipeDetailsSession::open(&*store, "r1").await.unwrap();
    assert_eq!(store.active_subscriptions().await, 2);
    session.close();
    assert_eq!(store.active_subscriptions().await, 0);
}
