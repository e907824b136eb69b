// ABOUTME: Main library entry point for the recipebook nutrition engine
// ABOUTME: Cached USDA FoodData Central lookups and keyword search with quota-aware sync
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Recipebook Nutrition
//!
//! Keeps a local cache of USDA `FoodData` Central records and answers
//! nutrition lookups from it, calling upstream only when needed.
//!
//! ## Architecture
//!
//! - **Database**: `SQLite` food cache and keyword-call ledger
//! - **External**: USDA API client and its mock
//! - **Nutrition**: normalizer, quota throttle, and the sync service
//! - **Routes**: axum HTTP surface
//! - **Config**: environment-driven settings
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use recipebook_nutrition::config::ServerConfig;
//! use recipebook_nutrition::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("{}", config.summary());
//!     Ok(())
//! }
//! ```

/// Environment configuration
pub mod config;
/// Application constants and defaults
pub mod constants;
/// Food cache and keyword-call ledger
pub mod database;
/// Upstream API clients
pub mod external;
/// Tracing subscriber setup
pub mod logging;
/// Normalization, throttling, and cache-first sync
pub mod nutrition;
/// Shared server state
pub mod resources;
/// HTTP routes
pub mod routes;
/// HTTP server lifecycle
pub mod server;

/// Unified error handling
pub use recipebook_core::errors;
/// Shared data models
pub use recipebook_core::models;
