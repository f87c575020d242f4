// ABOUTME: Per-user profile document: body metrics, BMI, and calorie target
// ABOUTME: Creates the document on first save and exposes a live profile subscription
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use cook_ai_intelligence::{calculate_bmi, BmiCategory};
use serde_json::json;
use tracing::{info, instrument, warn};

use super::user_path;
use crate::backend::{encode, Document, DocumentStore, DocumentSubscription, Fields};
use crate::errors::{AppError, AppResult};
use crate::models::{UserIdentity, UserProfile};

/// Live view of `users/{uid}`
pub struct ProfileSubscription {
    inner: DocumentSubscription,
}

impl ProfileSubscription {
    /// Wait for the next profile snapshot
    ///
    /// A missing document reads as an empty profile. Returns `None` once the
    /// backend stopped delivering.
    pub async fn next(&mut self) -> Option<UserProfile> {
        self.inner
            .next()
            .await
            .map(|doc| profile_from(doc.as_ref()))
    }

    /// Stop receiving snapshots
    pub fn unsubscribe(self) {
        self.inner.unsubscribe();
    }
}

/// Reads and writes the profile document
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn DocumentStore>,
}

impl ProfileService {
    /// Service backed by `store`
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Save body metrics and the derived BMI
    ///
    /// Updates the document when it exists and creates it otherwise, so saved
    /// recipes survive the update.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` without a user, `InvalidInput` for a zero height,
    /// or the backend's error.
    #[instrument(skip(self, user))]
    pub async fn update_details(
        &self,
        user: Option<&UserIdentity>,
        height_cm: u32,
        weight_kg: u32,
        daily_calories: u32,
    ) -> AppResult<UserProfile> {
        let user =
            user.ok_or_else(|| AppError::auth_required("You must be logged in to update your profile."))?;
        let bmi = calculate_bmi(weight_kg, height_cm)
            .ok_or_else(|| AppError::invalid_input("Height must be greater than zero."))?;

        let path = user_path(&user.uid);
        let existing = self.store.get(&path).await?;
        let mut profile = profile_from(existing.as_ref());
        profile.height = Some(height_cm);
        profile.weight = Some(weight_kg);
        profile.bmi = Some(bmi);
        profile.daily_calories = Some(daily_calories);

        if existing.is_some() {
            let changes: Fields = [
                ("height", json!(height_cm)),
                ("weight", json!(weight_kg)),
                ("bmi", json!(bmi)),
                ("dailyCalories", json!(daily_calories)),
            ]
            .into_iter()
            .map(|(name, value)| (name.to_owned(), value))
            .collect();
            self.store.update(&path, changes).await?;
        } else {
            self.store.set(&path, encode(&profile)?).await?;
        }
        info!(uid = %user.uid, bmi, "Updated profile details");
        Ok(profile)
    }

    /// Current profile, empty if the user never saved one
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` without a user or the backend's error.
    pub async fn profile(&self, user: Option<&UserIdentity>) -> AppResult<UserProfile> {
        let user = user.ok_or_else(|| AppError::auth_required("You must be logged in to view your profile."))?;
        let doc = self.store.get(&user_path(&user.uid)).await?;
        Ok(profile_from(doc.as_ref()))
    }

    /// Follow the profile document
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` without a user or the backend's error.
    pub async fn subscribe_profile(&self, user: Option<&UserIdentity>) -> AppResult<ProfileSubscription> {
        let user = user.ok_or_else(|| AppError::auth_required("You must be logged in to view your profile."))?;
        let inner = self.store.subscribe_document(&user_path(&user.uid)).await?;
        Ok(ProfileSubscription { inner })
    }

    /// BMI band for display
    #[must_use]
    pub fn classify_bmi(bmi: f64) -> BmiCategory {
        BmiCategory::classify(bmi)
    }
}

/// Decode a profile snapshot, treating a missing or malformed document as empty
pub(super) fn profile_from(doc: Option<&Document>) -> UserProfile {
    doc.map_or_else(UserProfile::default, |doc| {
        doc.decode().unwrap_or_else(|e| {
            warn!(uid = %doc.id, "Unreadable profile, using an empty one: {e}");
            UserProfile::default()
        })
    })
}
