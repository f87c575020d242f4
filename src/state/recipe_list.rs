// ABOUTME: View state of the matched-recipe list with a generation ticket per fetch
// ABOUTME: Distinguishes a pending fetch from a finished fetch with no matches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::{debug, warn};

use crate::errors::AppResult;
use crate::models::Recipe;

/// What the recipe list shows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RecipeListState {
    /// A fetch is in flight
    #[default]
    Loading,
    /// The fetch finished and nothing met the overlap threshold
    NoMatches,
    /// Ranked matches
    Ready(Vec<Recipe>),
}

/// Token handed out when a fetch starts; only the newest one is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct FetchTicket(u64);

/// Recipe list view model
#[derive(Debug, Default)]
pub struct RecipeListView {
    generation: u64,
    closed: bool,
    state: RecipeListState,
}

impl RecipeListView {
    /// View waiting for its first fetch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &RecipeListState {
        &self.state
    }

    /// Start a fetch, superseding any fetch still in flight
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = RecipeListState::Loading;
        FetchTicket(self.generation)
    }

    /// Deliver the result of the fetch identified by `ticket`
    ///
    /// Results from superseded fetches or arriving after [`Self::close`] are
    /// dropped and `false` is returned. A failed fetch is logged and shown as
    /// an empty list.
    pub fn complete(&mut self, ticket: FetchTicket, result: AppResult<Vec<Recipe>>) -> bool {
        if self.closed || ticket.0 != self.generation {
            debug!(
                ticket = ticket.0,
                current = self.generation,
                closed = self.closed,
                "Ignoring stale recipe fetch"
            );
            return false;
        }
        self.state = match result {
            Ok(recipes) if recipes.is_empty() => RecipeListState::NoMatches,
            Ok(recipes) => RecipeListState::Ready(recipes),
            Err(e) => {
                warn!("Failed to fetch matching recipes: {e}");
                RecipeListState::NoMatches
            }
        };
        true
    }

    /// Tear the view down; later results are ignored
    pub const fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    fn recipe(id: &str) -> Recipe {
        Recipe {
            id: id.to_owned(),
            ..Recipe::default()
        }
    }

    #[test]
    fn test_loading_and_no_matches_are_distinct() {
        let mut view = RecipeListView::new();
        let ticket = view.begin_fetch();
        assert_eq!(view.state(), &RecipeListState::Loading);
        assert!(view.complete(ticket, Ok(Vec::new())));
        assert_eq!(view.state(), &RecipeListState::NoMatches);
    }

    #[test]
    fn test_superseded_fetch_is_ignored() {
        let mut view = RecipeListView::new();
        let first = view.begin_fetch();
        let second = view.begin_fetch();
        assert!(view.complete(second, Ok(vec![recipe("new")])));
        assert!(!view.complete(first, Ok(vec![recipe("old")])));
        assert_eq!(view.state(), &RecipeListState::Ready(vec![recipe("new")]));
    }

    #[test]
    fn test_results_after_close_are_ignored() {
        let mut view = RecipeListView::new();
        let ticket = view.begin_fetch();
        view.close();
        assert!(!view.complete(ticket, Ok(vec![recipe("r1")])));
        assert_eq!(view.state(), &RecipeListState::Loading);
    }

    #[test]
    fn test_failed_fetch_degrades_to_empty() {
        let mut view = RecipeListView::new();
        let ticket = view.begin_fetch();
        assert!(view.complete(ticket, Err(AppError::external_unavailable("firestore", "offline"))));
        assert_eq!(view.state(), &RecipeListState::NoMatches);
    }
}
