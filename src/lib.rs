// ABOUTME: Main library entry point for the Cook AI recipe discovery client
// ABOUTME: Ingredient matching, live recipe feedback, saved recipes, profiles, and a chat assistant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Cook AI
//!
//! Client core for a recipe discovery app. Users pick ingredients they have,
//! get recipes that use at least three of them, open a recipe to see live
//! ratings and comments, rate and comment once per recipe, keep a list of saved
//! recipes, track BMI and a calorie target, and ask a chat assistant about
//! cooking (optionally with a photo).
//!
//! ## Architecture
//!
//! - **Backend**: document store contract with in-memory and Firestore implementations
//! - **Auth**: Firebase Authentication with refresh-token persistence
//! - **Services**: catalog reads, feedback upserts, saved recipes, profile
//! - **State**: selection store, recipe list view, live details session
//! - **Chat**: conversation history over an OpenAI-compatible endpoint
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cook_ai::backend::memory::InMemoryDocumentStore;
//! use cook_ai::services::RecipeCatalog;
//! use cook_ai::state::{Action, SelectionStore};
//!
//! #[tokio::main]
//! async fn main() -> cook_ai::errors::AppResult<()> {
//!     let catalog = RecipeCatalog::new(Arc::new(InMemoryDocumentStore::new()));
//!     let mut selection = SelectionStore::new();
//!     for name in ["egg", "flour", "milk"] {
//!         selection.dispatch(Action::ToggleIngredient(name.to_owned()));
//!     }
//!     let matches = catalog
//!         .find_matching_recipes(&selection.state().selected_ingredients)
//!         .await?;
//!     println!("{} recipes match", matches.len());
//!     Ok(())
//! }
//! ```

/// Authentication and session persistence
pub mod auth;

/// Document backend contract and implementations
pub mod backend;

/// Recipe assistant conversation
pub mod chat;

/// Environment configuration
pub mod config;

/// Dependency container
pub mod context;

/// Chat completion providers
pub mod llm;

/// Tracing setup and structured log helpers
pub mod logging;

/// Domain services over the backend
pub mod services;

/// Client view state
pub mod state;

pub use cook_ai_core::{constants, errors, models};
pub use cook_ai_intelligence as intelligence;
