// ABOUTME: Body mass index calculation and WHO weight-status classification
// ABOUTME: Used by the profile service when the user updates height and weight
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) of the underweight range
const UNDERWEIGHT_LIMIT: f64 = 18.5;
/// Upper bound (exclusive) of the normal range
const NORMAL_LIMIT: f64 = 25.0;
/// Upper bound (exclusive) of the overweight range
const OVERWEIGHT_LIMIT: f64 = 30.0;

/// Compute BMI from weight in kilograms and height in centimetres
///
/// The result is rounded to one decimal place. Returns `None` for a zero
/// height.
#[must_use]
pub fn calculate_bmi(weight_kg: u32, height_cm: u32) -> Option<f64> {
    if height_cm == 0 {
        return None;
    }
    let height_m = f64::from(height_cm) / 100.0;
    let bmi = f64::from(weight_kg) / (height_m * height_m);
    Some((bmi * 10.0).round() / 10.0)
}

/// Weight status derived from BMI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    /// BMI below 18.5
    Underweight,
    /// BMI from 18.5 up to 25
    Normal,
    /// BMI from 25 up to 30
    Overweight,
    /// BMI of 30 or more
    Obese,
}

impl BmiCategory {
    /// Classify a BMI value
    #[must_use]
    pub fn classify(bmi: f64) -> Self {
        if bmi < UNDERWEIGHT_LIMIT {
            Self::Underweight
        } else if bmi < NORMAL_LIMIT {
            Self::Normal
        } else if bmi < OVERWEIGHT_LIMIT {
            Self::Overweight
        } else {
            Self::Obese
        }
    }

    /// Display label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        }
    }
}
