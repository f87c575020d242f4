// ABOUTME: Ingredient-overlap recipe ranking
// ABOUTME: Annotates match counts, drops recipes under the threshold, sorts by overlap
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Recipe Matcher
//!
//! Given the candidate recipes and the user's selected ingredient names:
//!
//! 1. `matched_ingredients` is set to the number of distinct recipe
//!    ingredients that are also selected.
//! 2. Recipes with fewer than [`MIN_MATCHED_INGREDIENTS`] matches are dropped.
//! 3. The rest are ordered by match count, highest first. The sort is stable,
//!    so equal scores keep their fetch order.
//!
//! An empty selection always produces an empty result.

use std::collections::HashSet;

use cook_ai_core::constants::matching::MIN_MATCHED_INGREDIENTS;
use cook_ai_core::models::Recipe;
use tracing::debug;

/// Number of distinct ingredients of `recipe` present in `selected`
#[must_use]
pub fn matched_count(recipe: &Recipe, selected: &HashSet<&str>) -> usize {
    let mut seen = HashSet::with_capacity(recipe.ingredients.len());
    recipe
        .ingredients
        .iter()
        .map(String::as_str)
        .filter(|name| selected.contains(name) && seen.insert(*name))
        .count()
}

/// Rank candidates against the selected ingredient names
///
/// Returns only recipes meeting the minimum overlap, sorted by overlap
/// descending with ties in input order.
#[must_use]
pub fn rank_recipes<I>(candidates: I, selected: &[String]) -> Vec<Recipe>
where
    I: IntoIterator<Item = Recipe>,
{
    let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();
    if selected.is_empty() {
        return Vec::new();
    }

    let mut considered = 0_usize;
    let mut ranked: Vec<Recipe> = candidates
        .into_iter()
        .filter_map(|mut recipe| {
            considered += 1;
            recipe.matched_ingredients = matched_count(&recipe, &selected);
            (recipe.matched_ingredients >= MIN_MATCHED_INGREDIENTS).then_some(recipe)
        })
        .collect();

    ranked.sort_by(|a, b| b.matched_ingredients.cmp(&a.matched_ingredients));

    debug!(
        candidates = considered,
        kept = ranked.len(),
        selected = selected.len(),
        "Ranked recipes by ingredient overlap"
    );
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: &str, ingredients: &[&str]) -> Recipe {
        Recipe {
            id: id.to_owned(),
            name: id.to_owned(),
            ingredients: ingredients.iter().map(|s| (*s).to_owned()).collect(),
            ..Recipe::default()
        }
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_threshold_and_ordering() {
        let selected = names(&["egg", "flour", "milk", "sugar"]);
        let candidates = vec![
            recipe("A", &["egg", "flour", "milk"]),
            recipe("B", &["egg", "flour"]),
            recipe("C", &["egg", "flour", "milk", "sugar"]),
        ];

        let ranked = rank_recipes(candidates, &selected);
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["C", "A"]);
        assert_eq!(ranked[0].matched_ingredients, 4);
        assert_eq!(ranked[1].matched_ingredients, 3);
    }

    #[test]
    fn test_empty_selection_yields_nothing() {
        let candidates = vec![recipe("A", &["egg", "flour", "milk"])];
        assert!(rank_recipes(candidates, &[]).is_empty());
    }

    #[test]
    fn test_ties_keep_fetch_order() {
        let selected = names(&["a", "b", "c", "d"]);
        let candidates = vec![
            recipe("first", &["a", "b", "c"]),
            recipe("best", &["a", "b", "c", "d"]),
            recipe("second", &["b", "c", "d"]),
            recipe("third", &["a", "c", "d", "x"]),
        ];
        let ids: Vec<String> = rank_recipes(candidates, &selected)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["best", "first", "second", "third"]);
    }

    #[test]
    fn test_duplicate_recipe_ingredients_count_once() {
        let selected = names(&["egg", "flour", "milk"]);
        let r = recipe("dup", &["egg", "egg", "egg", "flour"]);
        let set: HashSet<&str> = selected.iter().map(String::as_str).collect();
        assert_eq!(matched_count(&r, &set), 2);
        assert!(rank_recipes(vec![r], &selected).is_empty());
    }

    #[test]
    fn test_output_is_thresholded_and_non_increasing() {
        let pool = ["egg", "flour", "milk", "sugar", "butter", "salt"];
        let selected = names(&pool[..4]);
        // Every subset of the pool as a recipe
        let candidates: Vec<Recipe> = (0_u32..64)
            .map(|mask| {
                let ingredients: Vec<&str> = pool
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, name)| *name)
                    .collect();
                recipe(&format!("r{mask}"), &ingredients)
            })
            .collect();

        let ranked = rank_recipes(candidates, &selected);
        assert!(ranked
            .iter()
            .all(|r| r.matched_ingredients >= MIN_MATCHED_INGREDIENTS));
        assert!(ranked
            .windows(2)
            .all(|w| w[0].matched_ingredients >= w[1].matched_ingredients));
        // 4 subsets of the selected four with exactly three, one with all four,
        // each combined with the 4 subsets of the two unselected names.
        assert_eq!(ranked.len(), (4 + 1) * 4);
    }
}
