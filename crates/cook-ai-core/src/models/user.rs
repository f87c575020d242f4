// ABOUTME: Authenticated user identity and the per-user profile document
// ABOUTME: Profile holds body metrics, calorie target, and saved recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{de, Deserialize, Deserializer, Serialize};

use super::recipe::Recipe;

/// Stable identity of the signed-in user, used for attribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    /// Backend user id
    pub uid: String,
    /// Display name, if the user set one
    #[serde(default)]
    pub display_name: Option<String>,
    /// E-mail address, absent for some federated accounts
    #[serde(default)]
    pub email: Option<String>,
}

impl UserIdentity {
    /// Name recorded on ratings and comments
    ///
    /// Falls back to the local part of the e-mail address when no display
    /// name is set.
    #[must_use]
    pub fn attribution_name(&self) -> Option<String> {
        self.display_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|email| email.split('@').next())
                    .map(str::to_owned)
            })
    }
}

/// Document stored at `users/{uid}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Height in centimetres
    #[serde(default)]
    pub height: Option<u32>,
    /// Weight in kilograms
    #[serde(default)]
    pub weight: Option<u32>,
    /// Body mass index rounded to one decimal
    ///
    /// Older clients stored it as a decimal string; both forms are accepted.
    #[serde(default, deserialize_with = "number_or_numeric_string")]
    pub bmi: Option<f64>,
    /// Daily calorie target
    #[serde(default)]
    pub daily_calories: Option<u32>,
    /// Recipes the user saved, stored as full copies
    #[serde(default)]
    pub saved_recipes: Vec<Recipe>,
}

impl UserProfile {
    /// Whether a recipe with this id is in the saved list
    #[must_use]
    pub fn has_saved(&self, recipe_id: &str) -> bool {
        self.saved_recipes.iter().any(|recipe| recipe.id == recipe_id)
    }
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        Number(f64),
        Text(String),
    }

    match Option::<Stored>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Stored::Number(value)) => Ok(Some(value)),
        Some(Stored::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(de::Error::custom),
    }
}
