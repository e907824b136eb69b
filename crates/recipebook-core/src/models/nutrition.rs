// ABOUTME: Canonical nutrition records cached from USDA FoodData Central
// ABOUTME: FoodRecord and FoodNutrient definitions shared by the store, normalizer, and routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Placeholder produced by the normalizer for absent text fields
pub const UNKNOWN_TEXT: &str = "Unknown";

/// A single nutrient measurement attached to a food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodNutrient {
    /// Provider nutrient identifier (e.g., "1003" for protein)
    pub nutrient_id: String,
    /// Nutrient name (e.g., "Protein", "Energy")
    pub name: String,
    /// Amount per reference portion, always positive once normalized
    pub amount: f64,
    /// Unit (e.g., "G", "KCAL", "MG")
    pub unit_name: String,
}

/// Canonical food item persisted in the nutrition cache
///
/// The `fdc_id` is issued by `FoodData` Central and uniquely identifies a
/// record. Records are never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    /// `FoodData` Central identifier
    pub fdc_id: String,
    /// Title-cased food description
    pub description: String,
    /// Title-cased food category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_category: Option<String>,
    /// Title-cased brand name or brand owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    /// Nutrients with a positive amount, in provider order
    #[serde(default)]
    pub nutrients: Vec<FoodNutrient>,
}

impl FoodRecord {
    /// Brand name, treating the `"Unknown"` placeholder as no brand
    #[must_use]
    pub fn brand(&self) -> Option<&str> {
        self.brand_name
            .as_deref()
            .filter(|brand| !brand.is_empty() && *brand != UNKNOWN_TEXT)
    }

    /// Whether this record carries a real brand
    #[must_use]
    pub fn has_brand(&self) -> bool {
        self.brand().is_some()
    }

    /// Look up a nutrient by provider identifier
    #[must_use]
    pub fn nutrient(&self, nutrient_id: &str) -> Option<&FoodNutrient> {
        self.nutrients
            .iter()
            .find(|nutrient| nutrient.nutrient_id == nutrient_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FoodRecord {
        FoodRecord {
            fdc_id: "2345678".to_owned(),
            description: "Large Brown Eggs".to_owned(),
            food_category: Some("Eggs".to_owned()),
            brand_name: Some("Happy Hen".to_owned()),
            nutrients: vec![FoodNutrient {
                nutrient_id: "1003".to_owned(),
                name: "Protein".to_owned(),
                amount: 12.5,
                unit_name: "G".to_owned(),
            }],
        }
    }

    #[test]
    fn test_wire_format_uses_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["fdcId"], "2345678");
        assert_eq!(json["foodCategory"], "Eggs");
        assert_eq!(json["brandName"], "Happy Hen");
        assert_eq!(json["nutrients"][0]["nutrientId"], "1003");
        assert_eq!(json["nutrients"][0]["unitName"], "G");
    }

    #[test]
    fn test_unknown_brand_is_no_brand() {
        let mut record = sample();
        assert_eq!(record.brand(), Some("Happy Hen"));

        record.brand_name = Some(UNKNOWN_TEXT.to_owned());
        assert!(!record.has_brand());

        record.brand_name = None;
        assert!(record.brand().is_none());
    }

    #[test]
    fn test_nutrient_lookup() {
        let record = sample();
        assert!(record.nutrient("1003").is_some());
        assert!(record.nutrient("1008").is_none());
    }
}
