// ABOUTME: Live recipe-details session keeping the selected recipe's feedback current
// ABOUTME: Applies ratings/comments pushes only while that recipe is still selected
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Recipe Details
//!
//! Opening a recipe subscribes to its `ratings` and `comments`
//! sub-collections. Each pushed snapshot replaces the matching field of the
//! selected recipe through the [`SelectionStore`], but only while the selected
//! recipe is still the one this session was opened for. A push that arrives
//! after the user cleared the selection or opened a different recipe is
//! dropped.

use cook_ai_intelligence::{average_rating, recent_comments};
use tracing::{debug, info};

use super::selection::{Action, SelectionState, SelectionStore};
use crate::backend::{decode_all, CollectionPath, CollectionSubscription, Document, DocumentStore};
use crate::constants::collections;
use crate::constants::matching::RECENT_COMMENTS;
use crate::errors::AppResult;
use crate::models::{Comment, Rating, Recipe};

/// Live feedback subscriptions for one recipe
pub struct RecipeDetailsSession {
    recipe_id: String,
    ratings: CollectionSubscription,
    comments: CollectionSubscription,
}

impl RecipeDetailsSession {
    /// Subscribe to the feedback of `recipe_id`
    ///
    /// # Errors
    ///
    /// Returns an error if either subscription cannot be established.
    pub async fn open(store: &dyn DocumentStore, recipe_id: &str) -> AppResult<Self> {
        let recipe = CollectionPath::root(collections::RECIPES).doc(recipe_id);
        let ratings = store
            .subscribe_collection(&recipe.collection(collections::RATINGS))
            .await?;
        let comments = store
            .subscribe_collection(&recipe.collection(collections::COMMENTS))
            .await?;
        info!(recipe_id, "Opened recipe details");
        Ok(Self {
            recipe_id: recipe_id.to_owned(),
            ratings,
            comments,
        })
    }

    /// Recipe this session follows
    #[must_use]
    pub fn recipe_id(&self) -> &str {
        &self.recipe_id
    }

    /// Apply every snapshot already delivered without waiting
    ///
    /// Returns the number of snapshots that changed the selection.
    pub fn apply_pending(&mut self, selection: &mut SelectionStore) -> usize {
        let ratings = self.ratings.latest();
        let comments = self.comments.latest();
        let mut applied = 0;
        if let Some(docs) = ratings {
            applied += usize::from(self.apply_ratings(&docs, selection));
        }
        if let Some(docs) = comments {
            applied += usize::from(self.apply_comments(&docs, selection));
        }
        applied
    }

    /// Wait for the next push and apply it
    ///
    /// Returns `false` once both subscriptions have stopped delivering.
    pub async fn next_update(&mut self, selection: &mut SelectionStore) -> bool {
        tokio::select! {
            Some(docs) = self.ratings.next() => {
                self.apply_ratings(&docs, selection);
                true
            }
            Some(docs) = self.comments.next() => {
                self.apply_comments(&docs, selection);
                true
            }
            else => false,
        }
    }

    /// Dispose both subscriptions
    pub fn close(self) {
        debug!(recipe_id = %self.recipe_id, "Closing recipe details");
        self.ratings.unsubscribe();
        self.comments.unsubscribe();
    }

    fn apply_ratings(&self, docs: &[Document], selection: &mut SelectionStore) -> bool {
        if !self.is_current(selection.state()) {
            return false;
        }
        let ratings: Vec<Rating> = decode_all(docs);
        selection.dispatch(Action::UpdateRatings(ratings));
        true
    }

    fn apply_comments(&self, docs: &[Document], selection: &mut SelectionStore) -> bool {
        if !self.is_current(selection.state()) {
            return false;
        }
        let comments: Vec<Comment> = decode_all(docs);
        selection.dispatch(Action::UpdateComments(comments));
        true
    }

    fn is_current(&self, state: &SelectionState) -> bool {
        let current = state.selected_recipe_id() == Some(self.recipe_id.as_str());
        if !current {
            debug!(recipe_id = %self.recipe_id, "Dropping feedback push for deselected recipe");
        }
        current
    }
}

/// What the details screen renders
#[derive(Debug, Clone, PartialEq)]
pub enum DetailsView<'a> {
    /// Placeholder shown when nothing is selected
    NoRecipeSelected,
    /// The selected recipe with derived feedback values
    Recipe {
        /// Selected recipe
        recipe: &'a Recipe,
        /// Mean rating, absent without ratings
        average_rating: Option<f64>,
        /// Newest comments, most recent last
        recent_comments: &'a [Comment],
    },
}

impl<'a> DetailsView<'a> {
    /// Derive the view from the current selection
    #[must_use]
    pub fn from_selection(state: &'a SelectionState) -> Self {
        state
            .selected_recipe
            .as_ref()
            .map_or(Self::NoRecipeSelected, |recipe| Self::Recipe {
                recipe,
                average_rating: average_rating(&recipe.ratings),
                recent_comments: recent_comments(&recipe.comments, RECENT_COMMENTS),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_selection_renders_placeholder() {
        let state = SelectionState::default();
        assert_eq!(DetailsView::from_selection(&state), DetailsView::NoRecipeSelected);
    }

    #[test]
    fn test_view_derives_average_and_recent_comments() {
        let comments: Vec<Comment> = (0..7)
            .map(|i| Comment {
                uid: format!("u{i}"),
                username: None,
                comment: format!("comment {i}"),
            })
            .collect();
        let state = SelectionState {
            selected_ingredients: Vec::new(),
            selected_recipe: Some(Recipe {
                id: "r1".to_owned(),
                ratings: vec![
                    Rating { uid: "a".to_owned(), username: None, rating: 4 },
                    Rating { uid: "b".to_owned(), username: None, rating: 5 },
                ],
                comments,
                ..Recipe::default()
            }),
        };
        let DetailsView::Recipe { average_rating, recent_comments, .. } =
            DetailsView::from_selection(&state)
        else {
            panic!("expected a recipe view");
        };
        assert_eq!(average_rating, Some(4.5));
        assert_eq!(recent_comments.len(), 5);
        assert_eq!(recent_comments[4].comment, "comment 6");
    }
}
