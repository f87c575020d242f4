// ABOUTME: Recipe matching and nutrition engine for the Cook AI platform
// ABOUTME: Pure, deterministic computations over documents already fetched from the backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Cook AI Intelligence
//!
//! Everything in this crate is a pure function of its inputs. Nothing here
//! performs I/O, so callers can re-run it on every selection change.

/// Rating averages and recent-comment windows for the details view
pub mod feedback;
/// Ingredient-overlap ranking of candidate recipes
pub mod matcher;
/// Body mass index calculation and classification
pub mod nutrition;

pub use feedback::{average_rating, recent_comments};
pub use matcher::{matched_count, rank_recipes};
pub use nutrition::{calculate_bmi, BmiCategory};
