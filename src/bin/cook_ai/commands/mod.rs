// ABOUTME: Command handlers for the cook-ai command-line client
// ABOUTME: Account, recipe, profile, and chat subcommands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod account;
pub mod chat;
pub mod profile;
pub mod recipes;
