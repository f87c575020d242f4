// ABOUTME: cook-ai command-line client for recipe discovery, feedback, profile, and chat
// ABOUTME: Parses subcommands, wires the app context from the environment, and reports errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Sign in (the session is remembered between runs)
//! cook-ai login --email chef@example.com --password secret
//!
//! # Find recipes using at least three of these ingredients
//! cook-ai match egg flour milk sugar
//!
//! # Open a recipe and follow new ratings and comments
//! cook-ai show 8fJ2kLx --follow
//!
//! # Rate and comment
//! cook-ai rate 8fJ2kLx --rating 5 --comment "Great with cinnamon"
//!
//! # Ask the assistant, optionally about a photo
//! cook-ai chat --image fridge.jpg "What can I cook tonight?"
//! ```

mod commands;
mod helpers;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cook_ai::config::AppConfig;
use cook_ai::context::AppContext;
use cook_ai::errors::AppResult;
use cook_ai::logging::LoggingConfig;
use tracing::debug;

use helpers::display::report_error;

#[derive(Parser)]
#[command(
    name = "cook-ai",
    about = "Cook AI recipe discovery client",
    long_about = "Find recipes from the ingredients you have, rate them, keep a saved list, track your BMI, and ask the cooking assistant."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Sign in with e-mail and password, or with a Google ID token
    Login {
        /// Account e-mail
        #[arg(long, required_unless_present = "google_id_token")]
        email: Option<String>,

        /// Account password
        #[arg(long, required_unless_present = "google_id_token")]
        password: Option<String>,

        /// Google ID token from a completed Google sign-in
        #[arg(long, conflicts_with_all = ["email", "password"])]
        google_id_token: Option<String>,
    },

    /// Create an account and sign in
    Signup {
        /// Account e-mail
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long)]
        password: String,
    },

    /// Sign out and forget the saved session
    Logout,

    /// Send a password-reset e-mail
    ResetPassword {
        /// Account e-mail
        #[arg(long)]
        email: String,
    },

    /// Change your display name
    Rename {
        /// New display name
        name: String,
    },

    /// List ingredients you can pick from
    Ingredients {
        /// Only show names containing this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Find recipes using at least three of the given ingredients
    Match {
        /// Ingredient names
        #[arg(required = true)]
        ingredients: Vec<String>,
    },

    /// Show a recipe with its ratings and comments
    Show {
        /// Recipe id
        recipe_id: String,

        /// Keep running and print feedback as it changes
        #[arg(long)]
        follow: bool,
    },

    /// Rate a recipe and optionally comment on it
    Rate {
        /// Recipe id
        recipe_id: String,

        /// Rating from 1 to 5
        #[arg(long)]
        rating: u8,

        /// Comment text
        #[arg(long)]
        comment: Option<String>,
    },

    /// Save a recipe, or remove it if already saved
    Save {
        /// Recipe id
        recipe_id: String,
    },

    /// List saved recipes, or suggestions when there are none
    Saved,

    /// Show or update your profile
    Profile {
        /// Height in centimetres
        #[arg(long, requires_all = ["weight", "calories"])]
        height: Option<u32>,

        /// Weight in kilograms
        #[arg(long, requires_all = ["height", "calories"])]
        weight: Option<u32>,

        /// Daily calorie target
        #[arg(long, requires_all = ["height", "weight"])]
        calories: Option<u32>,
    },

    /// Show the recipe of the month
    Featured,

    /// Chat with the cooking assistant; starts a conversation when no text is given
    Chat {
        /// Photo to attach to the first message
        #[arg(long)]
        image: Option<PathBuf>,

        /// Message text
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        "debug".clone_into(&mut logging.level);
    }
    if let Err(e) = logging.init() {
        eprintln!("Failed to initialize logging: {e}");
    }

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> AppResult<()> {
    let config = AppConfig::from_env()?;

    match command {
        Command::Login {
            email,
            password,
            google_id_token,
        } => {
            let mut ctx = open(&config).await?;
            commands::account::login(&mut ctx, email, password, google_id_token).await
        }
        Command::Signup { email, password } => {
            commands::account::signup(&mut open(&config).await?, &email, &password).await
        }
        Command::Logout => commands::account::logout(&mut open(&config).await?).await,
        Command::ResetPassword { email } => {
            commands::account::reset_password(&open(&config).await?, &email).await
        }
        Command::Rename { name } => commands::account::rename(&mut open(&config).await?, &name).await,
        Command::Ingredients { search } => {
            commands::recipes::ingredients(&open(&config).await?, search.as_deref()).await
        }
        Command::Match { ingredients } => {
            commands::recipes::find(&mut open(&config).await?, ingredients).await
        }
        Command::Show { recipe_id, follow } => {
            commands::recipes::show(&mut open(&config).await?, &recipe_id, follow).await
        }
        Command::Rate {
            recipe_id,
            rating,
            comment,
        } => {
            let ctx = open(&config).await?;
            commands::recipes::rate(&ctx, &recipe_id, rating, comment.as_deref()).await
        }
        Command::Save { recipe_id } => {
            commands::recipes::toggle_saved(&open(&config).await?, &recipe_id).await
        }
        Command::Saved => commands::recipes::saved(&open(&config).await?).await,
        Command::Profile {
            height,
            weight,
            calories,
        } => {
            let details = height.zip(weight).zip(calories);
            commands::profile::run(&open(&config).await?, details).await
        }
        Command::Featured => commands::recipes::featured(&open(&config).await?).await,
        Command::Chat { image, text } => {
            commands::chat::run(config.require_chat()?, image, &text.join(" ")).await
        }
    }
}

/// Build the context and resume the persisted session, if any
async fn open(config: &AppConfig) -> AppResult<AppContext> {
    let mut ctx = AppContext::from_config(config)?;
    if let Some(identity) = ctx.session.restore().await? {
        debug!(uid = %identity.uid, "Resumed session");
    }
    ctx.session.ensure_fresh().await?;
    Ok(ctx)
}
