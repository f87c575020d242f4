// ABOUTME: System prompt for the recipe chat assistant loaded at compile time
// ABOUTME: Prepended to every chat request ahead of the conversation history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # System Prompts
//!
//! Prompts are loaded at compile time from markdown files for easy maintenance.

/// Recipe assistant system prompt
///
/// Instructs the model to identify recipes from a photo of ingredients, list
/// them with their ingredients, and walk through the steps of a chosen one.
pub const RECIPE_ASSISTANT_PROMPT: &str = include_str!("recipe_assistant.md");

/// Get the system prompt for the recipe assistant
#[must_use]
pub fn get_recipe_assistant_prompt() -> &'static str {
    RECIPE_ASSISTANT_PROMPT.trim_end()
}
