// ABOUTME: Core types and constants for the Cook AI recipe discovery platform
// ABOUTME: Foundation crate with error handling, document models, and collection constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Cook AI Core
//!
//! Foundation crate providing shared types for the Cook AI workspace. It changes
//! infrequently so the backend, service, and CLI layers compile incrementally on
//! top of it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `AppResult`
//! - **constants**: Collection names, field names, and fixed thresholds
//! - **models**: Ingredient, recipe, rating, comment, and user profile documents

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Document models shared by every layer
pub mod models;
