// ABOUTME: Integration tests for upstream payload normalization
// ABOUTME: Verifies title casing, category and brand fallbacks, and nutrient filtering per shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{lookup_item, search_item};
use recipebook_nutrition::external::{CategoryField, LookupFoodItem, SearchFoodItem, SearchNutrient};
use recipebook_nutrition::models::UNKNOWN_TEXT;
use recipebook_nutrition::nutrition::{normalize, UpstreamFood};
use serde_json::json;

#[test]
fn test_search_item_normalization() {
    let record = normalize(UpstreamFood::Search(search_item(
        2_012_345,
        "LARGE BROWN EGGS",
    )));

    assert_eq!(record.fdc_id, "2012345");
    assert_eq!(record.description, "Large Brown Eggs");
    assert_eq!(record.food_category.as_deref(), Some("Dairy And Egg Products"));
    assert_eq!(record.brand_name.as_deref(), Some("Happy Hen Farms"));
    assert_eq!(record.nutrients.len(), 1);
    assert_eq!(record.nutrients[0].nutrient_id, "1003");
    assert_eq!(record.nutrients[0].name, "Protein");
    assert!((record.nutrients[0].amount - 12.5).abs() < f64::EPSILON);
    assert_eq!(record.nutrients[0].unit_name, "G");
}

#[test]
fn test_lookup_item_normalization() {
    let record = normalize(UpstreamFood::Lookup(lookup_item(555, "KETTLE CHIPS")));

    assert_eq!(record.fdc_id, "555");
    assert_eq!(record.description, "Kettle Chips");
    assert_eq!(record.food_category.as_deref(), Some("Snacks"));
    assert_eq!(record.brand_name.as_deref(), Some("Crunch Co"));
    // Entry without nested nutrient metadata is dropped
    assert_eq!(record.nutrients.len(), 1);
    assert_eq!(record.nutrients[0].nutrient_id, "1008");
    assert_eq!(record.nutrients[0].unit_name, "KCAL");
}

#[test]
fn test_food_category_preferred_over_branded_category() {
    let mut item = search_item(1, "OATS");
    item.food_category = Some("BREAKFAST CEREALS".to_owned());
    let record = normalize(item.into());
    assert_eq!(record.food_category.as_deref(), Some("Breakfast Cereals"));

    let mut lookup = lookup_item(2, "OATS");
    lookup.food_category = Some(CategoryField::Described {
        description: Some("GRAINS".to_owned()),
    });
    let record = normalize(lookup.into());
    assert_eq!(record.food_category.as_deref(), Some("Grains"));
}

#[test]
fn test_brand_name_preferred_over_owner() {
    let mut item = search_item(1, "SALSA");
    item.brand_name = Some("CASA VERDE".to_owned());
    let record = normalize(item.into());
    assert_eq!(record.brand_name.as_deref(), Some("Casa Verde"));
}

#[test]
fn test_missing_text_becomes_unknown() {
    let record = normalize(UpstreamFood::Search(SearchFoodItem {
        fdc_id: 9,
        description: Some("   ".to_owned()),
        ..SearchFoodItem::default()
    }));

    assert_eq!(record.description, UNKNOWN_TEXT);
    assert_eq!(record.food_category.as_deref(), Some(UNKNOWN_TEXT));
    assert_eq!(record.brand_name.as_deref(), Some(UNKNOWN_TEXT));
    assert!(!record.has_brand());
    assert!(record.nutrients.is_empty());
}

#[test]
fn test_non_positive_amounts_are_dropped() {
    let amounts = [Some(4.0), Some(0.0), Some(-1.0), None, Some(f64::INFINITY)];
    let item = SearchFoodItem {
        fdc_id: 3,
        description: Some("TEST".to_owned()),
        food_nutrients: amounts
            .iter()
            .enumerate()
            .map(|(i, value)| SearchNutrient {
                nutrient_id: Some(i as u64),
                nutrient_name: Some(format!("N{i}")),
                unit_name: Some("G".to_owned()),
                value: *value,
            })
            .collect(),
        ..SearchFoodItem::default()
    };

    let record = normalize(item.into());

    assert_eq!(record.nutrients.len(), 1);
    assert!(record.nutrients.iter().all(|n| n.amount > 0.0));
}

#[test]
fn test_lookup_payload_from_json() {
    let item: LookupFoodItem = serde_json::from_value(json!({
        "fdcId": 171_688,
        "description": "APPLES, RAW, WITH SKIN",
        "foodCategory": { "id": 9, "code": "0900", "description": "Fruits and Fruit Juices" },
        "foodNutrients": [
            { "nutrient": { "id": 1003, "number": "203", "name": "Protein", "unitName": "g" }, "amount": 0.26 },
            { "nutrient": { "id": 1004, "name": "Total lipid (fat)", "unitName": "g" }, "amount": 0.0 },
            { "type": "FoodNutrient", "amount": 5.0 }
        ]
    }))
    .unwrap();

    let record = normalize(item.into());

    assert_eq!(record.description, "Apples, Raw, With Skin");
    assert_eq!(record.food_category.as_deref(), Some("Fruits And Fruit Juices"));
    assert_eq!(record.brand_name.as_deref(), Some(UNKNOWN_TEXT));
    assert!(record.brand().is_none());
    assert_eq!(record.nutrients.len(), 1);
    assert_eq!(record.nutrients[0].name, "Protein");
}

#[test]
fn test_normalized_record_wire_format() {
    let record = normalize(search_item(77, "GREEK YOGURT").into());
    let value = serde_json::to_value(&record).unwrap();

    assert_eq!(value["fdcId"], "77");
    assert_eq!(value["description"], "Greek Yogurt");
    assert_eq!(value["foodCategory"], "Dairy And Egg Products");
    assert_eq!(value["brandName"], "Happy Hen Farms");
    assert_eq!(value["nutrients"][0]["nutrientId"], "1003");
}

#[test]
fn test_missing_brand_serializes_as_unknown() {
    let mut item = search_item(78, "PLAIN OATS");
    item.brand_owner = None;
    let record = normalize(item.into());
    let value = serde_json::to_value(&record).unwrap();

    assert_eq!(value["brandName"], UNKNOWN_TEXT);
    assert_eq!(value["foodCategory"], "Dairy And Egg Products");
}
