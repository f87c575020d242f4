// ABOUTME: Derived feedback values for the recipe details view
// ABOUTME: Average rating and the most recent comments window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use cook_ai_core::models::{Comment, Rating};

/// Mean of all rating values, `None` when nobody has rated yet
#[must_use]
pub fn average_rating(ratings: &[Rating]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let total: u32 = ratings.iter().map(|r| u32::from(r.rating)).sum();
    Some(f64::from(total) / ratings.len() as f64)
}

/// The last `limit` comments in snapshot order
#[must_use]
pub fn recent_comments(comments: &[Comment], limit: usize) -> &[Comment] {
    &comments[comments.len().saturating_sub(limit)..]
}
