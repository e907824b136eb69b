// ABOUTME: Configuration management module for the nutrition server
// ABOUTME: Re-exports the environment-driven server configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the nutrition server
//!
//! - **Environment**: Server, storage, upstream, throttle, and search settings
//!   loaded from environment variables

/// Environment and server configuration
pub mod environment;

pub use environment::{
    DatabaseConfig, DatabaseUrl, FdcApiConfig, HttpConfig, SearchConfig, ServerConfig,
    ThrottleConfig,
};
