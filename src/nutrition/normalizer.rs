// ABOUTME: Converts USDA search and lookup payloads into canonical FoodRecords
// ABOUTME: Title-cases text, applies category and brand fallbacks, drops empty nutrients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Response normalization
//!
//! The upstream API returns two item shapes: a flat one from the search
//! endpoint and a nested one from the lookup endpoint. Both are resolved here
//! into a [`FoodRecord`]; nothing past this module sees the raw shapes.
//!
//! Normalization is total. Missing text becomes `"Unknown"`, and nutrients
//! without a positive finite amount are dropped.

use crate::external::{LookupFoodItem, LookupNutrient, SearchFoodItem, SearchNutrient};
use crate::models::{FoodNutrient, FoodRecord, UNKNOWN_TEXT};

/// Raw upstream item, tagged by the endpoint that produced it
#[derive(Debug, Clone)]
pub enum UpstreamFood {
    /// Item from `/foods/search`
    Search(SearchFoodItem),
    /// Item from `/food/{id}`
    Lookup(LookupFoodItem),
}

impl From<SearchFoodItem> for UpstreamFood {
    fn from(item: SearchFoodItem) -> Self {
        Self::Search(item)
    }
}

impl From<LookupFoodItem> for UpstreamFood {
    fn from(item: LookupFoodItem) -> Self {
        Self::Lookup(item)
    }
}

/// Lowercase `text`, then uppercase the first character of every
/// space-separated word
///
/// Absent, empty, or whitespace-only input yields `"Unknown"`.
#[must_use]
pub fn title_case(text: Option<&str>) -> String {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return UNKNOWN_TEXT.to_owned();
    };

    text.to_lowercase()
        .split(' ')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// First non-blank candidate
fn first_present<'a>(candidates: [Option<&'a str>; 2]) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

fn positive_amount(amount: Option<f64>) -> Option<f64> {
    amount.filter(|value| value.is_finite() && *value > 0.0)
}

fn search_nutrient(nutrient: SearchNutrient) -> Option<FoodNutrient> {
    let amount = positive_amount(nutrient.value)?;
    Some(FoodNutrient {
        nutrient_id: nutrient
            .nutrient_id
            .map(|id| id.to_string())
            .unwrap_or_default(),
        name: nutrient
            .nutrient_name
            .unwrap_or_else(|| UNKNOWN_TEXT.to_owned()),
        amount,
        unit_name: nutrient.unit_name.unwrap_or_default(),
    })
}

fn lookup_nutrient(nutrient: LookupNutrient) -> Option<FoodNutrient> {
    let info = nutrient.nutrient?;
    let amount = positive_amount(nutrient.amount)?;
    Some(FoodNutrient {
        nutrient_id: info.id.to_string(),
        name: info.name.unwrap_or_else(|| UNKNOWN_TEXT.to_owned()),
        amount,
        unit_name: info.unit_name.unwrap_or_default(),
    })
}

/// Brand display value, `"Unknown"` when the upstream item names no brand
fn brand(name: Option<&str>, owner: Option<&str>) -> Option<String> {
    Some(title_case(first_present([name, owner])))
}

/// Normalize a search-endpoint item
#[must_use]
pub fn normalize_search_item(item: SearchFoodItem) -> FoodRecord {
    let category = first_present([
        item.food_category.as_deref(),
        item.branded_food_category.as_deref(),
    ]);

    FoodRecord {
        fdc_id: item.fdc_id.to_string(),
        description: title_case(item.description.as_deref()),
        food_category: Some(title_case(category)),
        brand_name: brand(item.brand_name.as_deref(), item.brand_owner.as_deref()),
        nutrients: item
            .food_nutrients
            .into_iter()
            .filter_map(search_nutrient)
            .collect(),
    }
}

/// Normalize a lookup-endpoint item
#[must_use]
pub fn normalize_lookup_item(item: LookupFoodItem) -> FoodRecord {
    let category = first_present([
        item.food_category.as_ref().and_then(|c| c.text()),
        item.branded_food_category.as_deref(),
    ]);

    FoodRecord {
        fdc_id: item.fdc_id.to_string(),
        description: title_case(item.description.as_deref()),
        food_category: Some(title_case(category)),
        brand_name: brand(item.brand_name.as_deref(), item.brand_owner.as_deref()),
        nutrients: item
            .food_nutrients
            .into_iter()
            .filter_map(lookup_nutrient)
            .collect(),
    }
}

/// Normalize either upstream shape
#[must_use]
pub fn normalize(food: UpstreamFood) -> FoodRecord {
    match food {
        UpstreamFood::Search(item) => normalize_search_item(item),
        UpstreamFood::Lookup(item) => normalize_lookup_item(item),
    }
}
