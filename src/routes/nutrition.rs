// ABOUTME: Route handlers for the nutrition REST API
// ABOUTME: Direct food lookup, keyword search, and nutrition health with throttle and cache stats
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrition routes
//!
//! - `GET /api/nutrition/search?q=..`: keyword search, JSON array
//! - `GET /api/nutrition/health`: throttle state and cache sizes
//! - `GET /api/nutrition/:id`: one food by `FoodData` Central ID

use crate::errors::AppError;
use crate::models::FoodRecord;
use crate::nutrition::sync::CacheStats;
use crate::nutrition::ThrottleStatus;
use crate::resources::ServerResources;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query parameters for keyword search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search keyword
    pub q: Option<String>,
}

/// Body of the nutrition health endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionHealthResponse {
    /// Always `"healthy"` when the store answered
    pub status: &'static str,
    /// Upstream quota throttle state
    pub throttle: ThrottleStatus,
    /// Cache and ledger sizes
    pub cache: CacheStats,
    /// Response time
    pub timestamp: String,
}

/// Nutrition routes implementation
pub struct NutritionRoutes;

impl NutritionRoutes {
    /// Create all nutrition routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/nutrition/search", get(Self::handle_search))
            .route("/api/nutrition/health", get(Self::handle_health))
            .route("/api/nutrition/:id", get(Self::handle_get))
            .with_state(resources)
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Json<FoodRecord>, AppError> {
        let record = resources.nutrition.resolve_by_id(id.trim()).await?;
        Ok(Json(record))
    }

    async fn handle_search(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<SearchQuery>,
    ) -> Result<Json<Vec<FoodRecord>>, AppError> {
        let keyword = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AppError::missing_field("q"))?;

        let limit = resources.nutrition.result_limit();
        let records = resources
            .nutrition
            .resolve_by_keyword(keyword, limit)
            .await?;
        Ok(Json(records))
    }

    async fn handle_health(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Json<NutritionHealthResponse>, AppError> {
        let cache = resources.nutrition.cache_stats().await?;
        Ok(Json(NutritionHealthResponse {
            status: "healthy",
            throttle: resources.throttle.status(),
            cache,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }))
    }
}
