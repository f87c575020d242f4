// ABOUTME: Recipe commands: ingredients, matching, details, feedback, saving, featured
// ABOUTME: Drives the selection store and view models the same way an interactive client would
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use cook_ai::constants::matching::RANDOM_SUGGESTIONS;
use cook_ai::context::AppContext;
use cook_ai::errors::{AppError, AppResult};
use cook_ai::models::Recipe;
use cook_ai::services::RecipeCatalog;
use cook_ai::state::{Action, DetailsView, RecipeDetailsSession, RecipeListState, RecipeListView};

use crate::helpers::display::{print_details, print_recipe_line};

/// List ingredients, optionally filtered
pub async fn ingredients(ctx: &AppContext, search: Option<&str>) -> AppResult<()> {
    let all = ctx.catalog().list_ingredients().await?;
    let shown = RecipeCatalog::search_ingredients(&all, search.unwrap_or_default());
    if shown.is_empty() {
        println!("No ingredients found.");
    }
    for ingredient in shown {
        println!("  {}", ingredient.name);
    }
    Ok(())
}

/// Select the given ingredients and list matching recipes
pub async fn find(ctx: &mut AppContext, names: Vec<String>) -> AppResult<()> {
    for name in names {
        ctx.selection.dispatch(Action::ToggleIngredient(name));
    }
    let selected = ctx.selection.state().selected_ingredients.clone();
    println!("Selected: {}", selected.join(", "));

    let mut view = RecipeListView::new();
    let ticket = view.begin_fetch();
    let result = ctx.catalog().find_matching_recipes(&selected).await;
    view.complete(ticket, result);

    match view.state() {
        RecipeListState::Loading => println!("Loading..."),
        RecipeListState::NoMatches => {
            println!("No recipes use at least three of these ingredients.");
        }
        RecipeListState::Ready(recipes) => {
            println!("{} recipes found:", recipes.len());
            recipes.iter().for_each(print_recipe_line);
        }
    }
    Ok(())
}

/// Open a recipe, optionally following live feedback until interrupted
pub async fn show(ctx: &mut AppContext, recipe_id: &str, follow: bool) -> AppResult<()> {
    let recipe = load(ctx, recipe_id).await?;
    ctx.selection.dispatch(Action::SelectRecipe(recipe));
    if !follow {
        print_details(&DetailsView::from_selection(ctx.selection.state()));
        return Ok(());
    }

    let mut session = RecipeDetailsSession::open(ctx.store().as_ref(), recipe_id).await?;
    session.apply_pending(&mut ctx.selection);
    print_details(&DetailsView::from_selection(ctx.selection.state()));
    while session.next_update(&mut ctx.selection).await {
        session.apply_pending(&mut ctx.selection);
        println!("\n--- feedback updated ---");
        print_details(&DetailsView::from_selection(ctx.selection.state()));
    }
    session.close();
    Ok(())
}

/// Rate a recipe and optionally comment
pub async fn rate(
    ctx: &AppContext,
    recipe_id: &str,
    rating: u8,
    comment: Option<&str>,
) -> AppResult<()> {
    load(ctx, recipe_id).await?;
    ctx.feedback()
        .submit(ctx.session.current_user(), recipe_id, rating, comment)
        .await?;
    println!("Your rating and comment have been saved.");
    Ok(())
}

/// Save or unsave a recipe
pub async fn toggle_saved(ctx: &AppContext, recipe_id: &str) -> AppResult<()> {
    let recipe = load(ctx, recipe_id).await?;
    let saved = ctx
        .saved()
        .toggle_saved(ctx.session.current_user(), &recipe)
        .await?;
    if saved {
        println!("Saved {}.", recipe.name);
    } else {
        println!("Removed {} from saved recipes.", recipe.name);
    }
    Ok(())
}

/// List saved recipes, or random suggestions when the list is empty
pub async fn saved(ctx: &AppContext) -> AppResult<()> {
    let saved = ctx.saved().saved_recipes(ctx.session.current_user()).await?;
    if saved.is_empty() {
        println!("You have no saved recipes yet. You might like:");
        let suggestions = ctx.catalog().random_suggestions(RANDOM_SUGGESTIONS).await?;
        suggestions.iter().for_each(print_recipe_line);
    } else {
        println!("Saved recipes:");
        saved.iter().for_each(print_recipe_line);
    }
    Ok(())
}

/// Show the recipe of the month
pub async fn featured(ctx: &AppContext) -> AppResult<()> {
    match ctx.catalog().recipe_of_the_month().await? {
        Some(recipe) => {
            println!("Recipe of the month:");
            print_recipe_line(&recipe);
        }
        None => println!("There is no recipe of the month right now."),
    }
    Ok(())
}

async fn load(ctx: &AppContext, recipe_id: &str) -> AppResult<Recipe> {
    ctx.catalog()
        .load_recipe(recipe_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))
}
