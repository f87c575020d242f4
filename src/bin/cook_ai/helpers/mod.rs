// ABOUTME: Helper modules for the cook-ai command-line client
// ABOUTME: Terminal output formatting shared by all commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod display;
