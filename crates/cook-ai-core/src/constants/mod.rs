// ABOUTME: Application-wide constants for collections, document fields, and thresholds
// ABOUTME: Single source of truth for the document layout used by every backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Top-level and nested collection names in the document backend
pub mod collections {
    /// Reference ingredient documents
    pub const INGREDIENTS: &str = "ingredients";
    /// Recipe documents
    pub const RECIPES: &str = "recipes";
    /// Per-recipe rating sub-collection
    pub const RATINGS: &str = "ratings";
    /// Per-recipe comment sub-collection
    pub const COMMENTS: &str = "comments";
    /// Per-user profile documents keyed by uid
    pub const USERS: &str = "users";
    /// Pointer to the featured recipe
    pub const RECIPE_OF_THE_MONTH: &str = "recipeofthemonth";
}

/// Document field names used in queries and partial updates
pub mod fields {
    /// Recipe ingredient list
    pub const INGREDIENTS: &str = "ingredients";
    /// Author uid on ratings and comments
    pub const UID: &str = "uid";
    /// Rating value
    pub const RATING: &str = "rating";
    /// Comment text
    pub const COMMENT: &str = "comment";
    /// Saved recipe list on the user document
    pub const SAVED_RECIPES: &str = "savedRecipes";
    /// Featured recipe id on the recipe-of-the-month document
    pub const RECIPE_ID: &str = "recipeId";
}

/// Recipe matching and presentation limits
pub mod matching {
    /// Minimum number of shared ingredients for a recipe to be shown
    pub const MIN_MATCHED_INGREDIENTS: usize = 3;
    /// Maximum values accepted by a single "array contains any" query
    pub const MAX_ANY_OF_VALUES: usize = 30;
    /// Number of random suggestions shown when nothing is saved
    pub const RANDOM_SUGGESTIONS: usize = 3;
    /// Number of most recent comments shown on the details view
    pub const RECENT_COMMENTS: usize = 5;
}

/// Rating bounds
pub mod feedback {
    /// Lowest accepted rating
    pub const MIN_RATING: u8 = 1;
    /// Highest accepted rating
    pub const MAX_RATING: u8 = 5;
}

/// Chat assistant defaults
pub mod chat {
    /// Sampling temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;
    /// Nucleus sampling threshold
    pub const DEFAULT_TOP_P: f32 = 0.95;
    /// Maximum output tokens per reply
    pub const DEFAULT_MAX_TOKENS: u32 = 800;
    /// Synthetic assistant reply appended when the endpoint fails
    pub const FAILURE_REPLY: &str = "Error getting response from AI.";
    /// MIME type assumed for attached photos without a known extension
    pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";
}

/// Service names used in logs and errors
pub mod service_names {
    /// Binary and tracing service name
    pub const COOK_AI: &str = "cook-ai";
    /// Firestore document backend
    pub const FIRESTORE: &str = "Firestore";
    /// Firebase authentication backend
    pub const FIREBASE_AUTH: &str = "FirebaseAuth";
    /// Chat completion endpoint
    pub const CHAT_ENDPOINT: &str = "ChatEndpoint";
}
