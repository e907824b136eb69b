// ABOUTME: Domain model module for canonical nutrition reference data
// ABOUTME: Re-exports FoodRecord and FoodNutrient
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Canonical food and nutrient records
pub mod nutrition;

pub use nutrition::{FoodNutrient, FoodRecord, UNKNOWN_TEXT};
