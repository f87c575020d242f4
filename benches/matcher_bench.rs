// ABOUTME: Criterion benchmarks for recipe matching and ranking
// ABOUTME: Measures the pure ranker and the store-backed catalog search
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for recipe matching.
//!
//! Covers `rank_recipes` over candidate sets of increasing size and the full
//! `RecipeCatalog::find_matching_recipes` path against the in-memory store.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use std::sync::Arc;

use cook_ai::backend::memory::InMemoryDocumentStore;
use cook_ai::backend::{CollectionPath, DocumentStore};
use cook_ai::constants::collections;
use cook_ai::intelligence::rank_recipes;
use cook_ai::models::Recipe;
use cook_ai::services::RecipeCatalog;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;
use tokio::runtime::Runtime;

/// Pantry the benchmark recipes draw their ingredients from
const PANTRY: [&str; 24] = [
    "egg", "milk", "flour", "butter", "sugar", "salt", "pepper", "tomato", "onion", "garlic",
    "rice", "pasta", "cheese", "spinach", "chicken", "beef", "lemon", "basil", "yogurt", "potato",
    "carrot", "mushroom", "olive oil", "parsley",
];

/// Deterministic recipes using six pantry items each
fn generate_recipes(count: usize) -> Vec<Recipe> {
    (0..count)
        .map(|index| Recipe {
            id: format!("recipe-{index}"),
            name: format!("Benchmark Recipe {index}"),
            cook_time: 10 + u32::try_from(index % 50).unwrap(),
            ingredients: (0..6)
                .map(|offset| PANTRY[(index * 7 + offset * 5) % PANTRY.len()].to_owned())
                .collect(),
            ..Recipe::default()
        })
        .collect()
}

fn selection(size: usize) -> Vec<String> {
    PANTRY.iter().take(size).map(|&name| name.to_owned()).collect()
}

fn bench_rank_recipes(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_recipes");
    let selected = selection(8);

    for count in [50_u64, 500, 5_000] {
        let recipes = generate_recipes(usize::try_from(count).unwrap());
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &recipes, |b, recipes| {
            b.iter(|| rank_recipes(black_box(recipes.clone()), black_box(&selected)));
        });
    }

    group.finish();
}

fn bench_selection_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_by_selection_size");
    let recipes = generate_recipes(1_000);

    for size in [3_usize, 12, 24] {
        let selected = selection(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &selected, |b, selected| {
            b.iter(|| rank_recipes(black_box(recipes.clone()), black_box(selected)));
        });
    }

    group.finish();
}

fn bench_catalog_search(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let store = Arc::new(InMemoryDocumentStore::new());
    let recipes_path = CollectionPath::root(collections::RECIPES);

    rt.block_on(async {
        for recipe in generate_recipes(300) {
            let fields = json!({
                "name": recipe.name,
                "cookTime": recipe.cook_time,
                "ingredients": recipe.ingredients,
            });
            store
                .set(
                    &recipes_path.doc(recipe.id.clone()),
                    fields.as_object().unwrap().clone(),
                )
                .await
                .unwrap();
        }
    });

    let catalog = RecipeCatalog::new(store);
    let selected = selection(6);

    c.bench_function("catalog_find_matching_recipes", |b| {
        b.iter(|| {
            rt.block_on(async {
                black_box(catalog.find_matching_recipes(&selected).await.unwrap());
            });
        });
    });
}

criterion_group!(
    benches,
    bench_rank_recipes,
    bench_selection_size,
    bench_catalog_search
);
criterion_main!(benches);
