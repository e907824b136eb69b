// ABOUTME: External API clients for third-party data sources
// ABOUTME: Hosts the USDA FoodData Central client and its test double
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! External API clients

/// USDA `FoodData` Central client
pub mod usda_client;

pub use usda_client::{
    CategoryField, FoodDataClient, LookupFoodItem, LookupNutrient, MockFoodDataClient,
    NutrientInfo, SearchFoodItem, SearchNutrient, UpstreamReply, UsdaClient,
};
