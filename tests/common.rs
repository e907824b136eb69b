// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, mock USDA clients, upstream fixtures, and service wiring
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `recipebook_nutrition`

use anyhow::Result;
use recipebook_nutrition::{
    config::{
        DatabaseConfig, DatabaseUrl, FdcApiConfig, HttpConfig, SearchConfig, ServerConfig,
        ThrottleConfig,
    },
    database::Database,
    external::{
        FoodDataClient, LookupFoodItem, LookupNutrient, MockFoodDataClient, NutrientInfo,
        SearchFoodItem, SearchNutrient,
    },
    models::{FoodNutrient, FoodRecord},
    nutrition::{NutritionSyncService, ThrottleController},
    resources::ServerResources,
};
use std::sync::{Arc, Once};
use std::time::Duration;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    Ok(Arc::new(Database::in_memory().await?))
}

/// Throttle settings used across tests
pub fn test_throttle_config() -> ThrottleConfig {
    ThrottleConfig {
        safety_threshold: 300,
        cooldown: Duration::from_secs(3_600),
    }
}

/// Search settings used across tests
pub fn test_search_config(result_limit: usize) -> SearchConfig {
    SearchConfig {
        result_limit,
        page_size: 25,
    }
}

/// Configuration pointing at an in-memory database and a fake key
pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        http: HttpConfig::default(),
        database: DatabaseConfig {
            url: DatabaseUrl::Memory,
            max_connections: 1,
        },
        fdc: FdcApiConfig::with_api_key("test-key"),
        throttle: test_throttle_config(),
        search: test_search_config(10),
    }
}

/// Sync service over `database` and `client` with a fresh throttle
pub fn create_sync_service(
    database: &Arc<Database>,
    client: Arc<dyn FoodDataClient>,
    result_limit: usize,
) -> (NutritionSyncService, Arc<ThrottleController>) {
    let throttle = Arc::new(ThrottleController::new(test_throttle_config()));
    let service = NutritionSyncService::new(
        database.clone(),
        database.clone(),
        client,
        throttle.clone(),
        test_search_config(result_limit),
    );
    (service, throttle)
}

/// Server resources over an in-memory database and a mock client
pub async fn create_test_server_resources(
    client: Arc<MockFoodDataClient>,
) -> Result<Arc<ServerResources>> {
    init_test_logging();
    let database = Database::in_memory().await?;
    Ok(Arc::new(ServerResources::new(
        test_server_config(),
        database,
        client,
    )))
}

/// Branded search item with one positive and one zero nutrient
pub fn search_item(fdc_id: u64, description: &str) -> SearchFoodItem {
    SearchFoodItem {
        fdc_id,
        description: Some(description.to_owned()),
        food_category: None,
        branded_food_category: Some("DAIRY AND EGG PRODUCTS".to_owned()),
        brand_name: None,
        brand_owner: Some("HAPPY HEN FARMS".to_owned()),
        food_nutrients: vec![
            SearchNutrient {
                nutrient_id: Some(1003),
                nutrient_name: Some("Protein".to_owned()),
                unit_name: Some("G".to_owned()),
                value: Some(12.5),
            },
            SearchNutrient {
                nutrient_id: Some(1005),
                nutrient_name: Some("Carbohydrate, by difference".to_owned()),
                unit_name: Some("G".to_owned()),
                value: Some(0.0),
            },
        ],
    }
}

/// Lookup item shaped like `/food/{id}` responses
pub fn lookup_item(fdc_id: u64, description: &str) -> LookupFoodItem {
    LookupFoodItem {
        fdc_id,
        description: Some(description.to_owned()),
        food_category: None,
        branded_food_category: Some("SNACKS".to_owned()),
        brand_name: Some("CRUNCH CO".to_owned()),
        brand_owner: None,
        food_nutrients: vec![
            LookupNutrient {
                nutrient: Some(NutrientInfo {
                    id: 1008,
                    name: Some("Energy".to_owned()),
                    unit_name: Some("KCAL".to_owned()),
                }),
                amount: Some(520.0),
            },
            LookupNutrient {
                nutrient: None,
                amount: Some(3.0),
            },
        ],
    }
}

/// Already-normalized record for seeding the store directly
pub fn food_record(fdc_id: &str, description: &str) -> FoodRecord {
    FoodRecord {
        fdc_id: fdc_id.to_owned(),
        description: description.to_owned(),
        food_category: Some("Dairy And Egg Products".to_owned()),
        brand_name: None,
        nutrients: vec![FoodNutrient {
            nutrient_id: "1003".to_owned(),
            name: "Protein".to_owned(),
            amount: 6.3,
            unit_name: "G".to_owned(),
        }],
    }
}

/// Ids of `records`, in order
pub fn ids(records: &[FoodRecord]) -> Vec<String> {
    records.iter().map(|r| r.fdc_id.clone()).collect()
}
