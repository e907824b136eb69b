// ABOUTME: HTTP router assembly for the nutrition server
// ABOUTME: Merges route groups and applies tracing, request-id, timeout, and CORS layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route modules and the top-level router

/// Liveness endpoint
pub mod health;
/// Nutrition lookup, search, and health endpoints
pub mod nutrition;

pub use health::HealthRoutes;
pub use nutrition::NutritionRoutes;

use crate::resources::ServerResources;
use axum::body::Body;
use axum::http::{HeaderName, Request};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info_span;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let request_timeout = resources.config.http.request_timeout;

    Router::new()
        .merge(HealthRoutes::routes())
        .merge(NutritionRoutes::routes(resources))
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");
                info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}
