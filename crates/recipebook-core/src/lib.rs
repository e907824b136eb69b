// ABOUTME: Core types for the recipebook nutrition sync engine
// ABOUTME: Foundation crate with unified error handling and canonical nutrition models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Recipebook Core
//!
//! Foundation crate shared by the nutrition server and its tests. It changes
//! infrequently so the main crate keeps its incremental compilation benefits.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **models**: Canonical `FoodRecord` and `FoodNutrient` persisted by the cache

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Canonical nutrition models
pub mod models;
