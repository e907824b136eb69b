// ABOUTME: Shared server resources handed to every route as axum state
// ABOUTME: Wires the database, upstream client, throttle, and sync service together once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Dependency wiring for the HTTP layer

use crate::config::ServerConfig;
use crate::database::Database;
use crate::external::FoodDataClient;
use crate::nutrition::{NutritionSyncService, ThrottleController};
use std::sync::Arc;

/// Long-lived components shared across requests
pub struct ServerResources {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Food cache and call ledger
    pub database: Arc<Database>,
    /// Upstream quota throttle
    pub throttle: Arc<ThrottleController>,
    /// Cache-first resolver
    pub nutrition: Arc<NutritionSyncService>,
}

impl ServerResources {
    /// Wire resources around an open database and an upstream client
    #[must_use]
    pub fn new(
        config: ServerConfig,
        database: Database,
        client: Arc<dyn FoodDataClient>,
    ) -> Self {
        let database = Arc::new(database);
        let throttle = Arc::new(ThrottleController::new(config.throttle));
        let nutrition = Arc::new(NutritionSyncService::new(
            database.clone(),
            database.clone(),
            client,
            throttle.clone(),
            config.search,
        ));

        Self {
            config: Arc::new(config),
            database,
            throttle,
            nutrition,
        }
    }
}
