// ABOUTME: Terminal output for recipes, feedback, profiles, and errors
// ABOUTME: Keeps formatting out of the command handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use cook_ai::errors::{AppError, ErrorCode};
use cook_ai::models::{Recipe, UserProfile};
use cook_ai::services::ProfileService;
use cook_ai::state::DetailsView;
use tracing::error;

/// One-line summary used in lists
pub fn print_recipe_line(recipe: &Recipe) {
    let matched = if recipe.matched_ingredients > 0 {
        format!(" | {} matching", recipe.matched_ingredients)
    } else {
        String::new()
    };
    println!(
        "  [{}] {} | {} min | {:.0} kcal{matched}",
        recipe.id, recipe.name, recipe.cook_time, recipe.calories
    );
}

/// Full recipe page
pub fn print_details(view: &DetailsView<'_>) {
    let DetailsView::Recipe {
        recipe,
        average_rating,
        recent_comments,
    } = view
    else {
        println!("No recipe selected.");
        return;
    };

    println!("\n{}", recipe.name);
    println!("{}", "=".repeat(recipe.name.chars().count().max(10)));
    println!("Cook time: {} min   Calories: {:.0} kcal", recipe.cook_time, recipe.calories);
    match average_rating {
        Some(avg) => println!("Rating: {avg:.1} / 5 ({} ratings)", recipe.ratings.len()),
        None => println!("Rating: not rated yet"),
    }

    println!("\nIngredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {ingredient}");
    }

    println!("\nSteps:");
    for (n, step) in recipe.steps.iter().enumerate() {
        println!("  {}. {step}", n + 1);
    }

    if !recent_comments.is_empty() {
        println!("\nRecent comments:");
        for comment in *recent_comments {
            println!("  {}: {}", comment.author(), comment.comment);
        }
    }
}

/// Profile summary with BMI band
pub fn print_profile(profile: &UserProfile) {
    let show = |value: Option<u32>, unit: &str| {
        value.map_or_else(|| "not set".to_owned(), |v| format!("{v} {unit}"))
    };
    println!("Height: {}", show(profile.height, "cm"));
    println!("Weight: {}", show(profile.weight, "kg"));
    match profile.bmi {
        Some(bmi) => println!("BMI: {bmi:.1} ({})", ProfileService::classify_bmi(bmi).label()),
        None => println!("BMI: not set"),
    }
    println!("Daily calories: {}", show(profile.daily_calories, "kcal"));
    println!("Saved recipes: {}", profile.saved_recipes.len());
}

/// Print an error for the user and log the full chain
pub fn report_error(e: &AppError) {
    error!("{e}");
    match e.code {
        ErrorCode::ConfigMissing | ErrorCode::ConfigInvalid => {
            eprintln!("Configuration error: {}", e.message);
        }
        _ => eprintln!("{}", e.user_message()),
    }
}
