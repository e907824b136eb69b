// ABOUTME: Nutrition sync engine: normalization, quota throttling, and cache-first resolution
// ABOUTME: Re-exports the sync service, throttle controller, and normalizer entry points
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrition sync engine
//!
//! Requests are resolved against the local cache first. The upstream
//! `FoodData` Central API is consulted only when the cache cannot answer, the
//! keyword has never been searched before, and the quota throttle is open.

/// Upstream payload normalization
pub mod normalizer;
/// Cache-first resolution of lookups and keyword searches
pub mod sync;
/// Quota-driven suspension of upstream calls
pub mod throttle;

pub use normalizer::{normalize, title_case, UpstreamFood};
pub use sync::NutritionSyncService;
pub use throttle::{ThrottleController, ThrottleStatus};
