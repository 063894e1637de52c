// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! IMC (body mass index) classification.
//!
//! Weight and height arrive as decimal strings. The outcome distinguishes
//! "not computable" (a value is missing) from "invalid input" (a value does
//! not parse) from a classified category; on the wire all three become a
//! label string.

use std::fmt;

/// Label stored when weight or height is missing.
pub const NOT_COMPUTABLE_LABEL: &str = "N/A";
/// Label stored when weight or height is not a number.
pub const INVALID_INPUT_LABEL: &str = "Invalid input";

/// IMC band, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImcCategory {
    /// IMC < 18.5
    Underweight,
    /// 18.5 <= IMC < 25
    Normal,
    /// 25 <= IMC < 30
    Overweight,
    /// IMC >= 30, and any non-finite result
    Obese,
}

impl ImcCategory {
    /// Band for a computed index.
    ///
    /// Anything failing the lower bands lands in [`ImcCategory::Obese`],
    /// including `inf` (zero height) and `NaN` (zero weight and height).
    pub fn from_index(index: f64) -> Self {
        if index < 18.5 {
            ImcCategory::Underweight
        } else if index < 25.0 {
            ImcCategory::Normal
        } else if index < 30.0 {
            ImcCategory::Overweight
        } else {
            ImcCategory::Obese
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ImcCategory::Underweight => "Soldado del Burgo De Los No Muertos",
            ImcCategory::Normal => "NPC",
            ImcCategory::Overweight => "Susi Slayer",
            ImcCategory::Obese => "Burger King Slayer",
        }
    }
}

/// Result of classifying a (weight, height) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImcOutcome {
    /// Weight or height was empty
    NotComputable,
    /// Weight or height did not parse as a number
    InvalidInput,
    Classified { index: f64, category: ImcCategory },
}

impl ImcOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ImcOutcome::NotComputable => NOT_COMPUTABLE_LABEL,
            ImcOutcome::InvalidInput => INVALID_INPUT_LABEL,
            ImcOutcome::Classified { category, .. } => category.label(),
        }
    }
}

impl fmt::Display for ImcOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify weight (kg) over height (m) squared.
pub fn classify(weight: &str, height: &str) -> ImcOutcome {
    if weight.is_empty() || height.is_empty() {
        return ImcOutcome::NotComputable;
    }

    let (Some(weight), Some(height)) = (parse_decimal(weight), parse_decimal(height)) else {
        tracing::debug!("IMC input is not numeric");
        return ImcOutcome::InvalidInput;
    };

    let index = weight / (height * height);
    ImcOutcome::Classified {
        index,
        category: ImcCategory::from_index(index),
    }
}

/// Parse at single precision, then widen for the division.
fn parse_decimal(value: &str) -> Option<f64> {
    value.parse::<f32>().ok().map(f64::from)
}
