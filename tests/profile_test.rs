// ABOUTME: Integration tests for the profile service
// ABOUTME: BMI rounding and classification, create-or-update, and input validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use cook_ai::errors::ErrorCode;
use cook_ai::intelligence::BmiCategory;
use cook_ai::services::{ProfileService, SavedRecipes};

use common::{identity, memory_store, recipe};

#[tokio::test]
async fn test_first_save_creates_profile_with_rounded_bmi() {
    let profiles = ProfileService::new(memory_store());
    let user = identity("u1", "Ayşe");

    let profile = profiles
        .update_details(Some(&user), 180, 72, 2200)
        .await
        .unwrap();
    // 72 / 1.8^2 = 22.22
    assert_eq!(profile.bmi, Some(22.2));

    let stored = profiles.profile(Some(&user)).await.unwrap();
    assert_eq!(stored.height, Some(180));
    assert_eq!(stored.weight, Some(72));
    assert_eq!(stored.daily_calories, Some(2200));
    assert_eq!(stored.bmi, Some(22.2));
}

#[tokio::test]
async fn test_update_keeps_saved_recipes() {
    let store = memory_store();
    let user = identity("u1", "Ayşe");
    SavedRecipes::new(store.clone())
        .toggle_saved(Some(&user), &recipe("r1", &["egg"]))
        .await
        .unwrap();

    let profiles = ProfileService::new(store);
    profiles
        .update_details(Some(&user), 160, 77, 1800)
        .await
        .unwrap();
    let stored = profiles.profile(Some(&user)).await.unwrap();
    assert_eq!(stored.bmi, Some(30.1));
    assert!(stored.has_saved("r1"));
    assert_eq!(
        ProfileService::classify_bmi(stored.bmi.unwrap()),
        BmiCategory::Obese
    );
}

#[tokio::test]
async fn test_zero_height_is_rejected() {
    let profiles = ProfileService::new(memory_store());
    let err = profiles
        .update_details(Some(&identity("u1", "A")), 0, 70, 2000)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_missing_profile_reads_as_empty() {
    let profiles = ProfileService::new(memory_store());
    let profile = profiles.profile(Some(&identity("u1", "A"))).await.unwrap();
    assert!(profile.bmi.is_none());
    assert!(profile.saved_recipes.is_empty());
    assert_eq!(
        profiles.profile(None).await.unwrap_err().code,
        ErrorCode::AuthRequired
    );
}

#[test]
fn test_bmi_bands() {
    assert_eq!(ProfileService::classify_bmi(18.4), BmiCategory::Underweight);
    assert_eq!(ProfileService::classify_bmi(18.5), BmiCategory::Normal);
    assert_eq!(ProfileService::classify_bmi(24.9), BmiCategory::Normal);
    assert_eq!(ProfileService::classify_bmi(25.0), BmiCategory::Overweight);
    assert_eq!(ProfileService::classify_bmi(30.0), BmiCategory::Obese);
}
