// ABOUTME: Configuration module for backend, authentication, and chat settings
// ABOUTME: Environment-only configuration, no config files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for Cook AI
//!
//! Everything is read from environment variables once at startup:
//!
//! - **Firebase**: project, API key, database id, emulator hosts, poll interval
//! - **Chat**: completion endpoint, key and key style, sampling parameters
//! - **Session**: where the refresh token is persisted between runs

/// Environment variable parsing
pub mod environment;

pub use environment::{AppConfig, ChatConfig, FirebaseConfig};
