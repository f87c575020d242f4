// ABOUTME: Rating and comment records stored under each recipe
// ABOUTME: One record of each kind per user, keyed by uid for upserts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// A user's rating of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Author uid
    pub uid: String,
    /// Author display name at the time of rating
    #[serde(default)]
    pub username: Option<String>,
    /// Rating value
    pub rating: u8,
}

/// A user's comment on a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Author uid
    pub uid: String,
    /// Author display name at the time of commenting
    #[serde(default)]
    pub username: Option<String>,
    /// Comment text
    pub comment: String,
}

impl Comment {
    /// Name shown next to the comment
    #[must_use]
    pub fn author(&self) -> &str {
        self.username.as_deref().unwrap_or("Anonymous")
    }
}
