// ABOUTME: Application-wide constants for the nutrition engine
// ABOUTME: Upstream API parameters, throttle defaults, search sizing, and server defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants grouped by concern. Runtime overrides live in
//! [`crate::config::environment`]; these are the defaults it falls back to.

/// Service identity used in logs and health responses
pub mod service_names {
    /// Name reported by the server binary
    pub const NUTRITION_SERVER: &str = "recipebook-nutrition";
}

/// USDA `FoodData` Central API parameters
pub mod fdc {
    /// Production API base URL
    pub const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";

    /// Service label used in error messages
    pub const SERVICE_NAME: &str = "USDA API";

    /// Data type filter applied to keyword searches
    pub const SEARCH_DATA_TYPE: &str = "Branded";

    /// Response header carrying the remaining hourly quota
    pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

    /// Page size requested from the search endpoint
    pub const DEFAULT_SEARCH_PAGE_SIZE: u32 = 25;

    /// Largest page size the search endpoint accepts
    pub const MAX_SEARCH_PAGE_SIZE: u32 = 200;

    /// Upstream request timeout
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
}

/// Quota protection defaults
pub mod throttle {
    /// Remaining-quota value below which upstream calls are suspended
    pub const DEFAULT_QUOTA_SAFETY_THRESHOLD: u32 = 300;

    /// How long upstream calls stay suspended once tripped
    pub const DEFAULT_COOLDOWN_SECS: u64 = 3_600; // 1 hour
}

/// Keyword search sizing
pub mod search {
    /// Number of exact matches that satisfies a keyword search without upstream
    pub const DEFAULT_RESULT_LIMIT: usize = 10;

    /// Multiplier applied to the limit to cap merged results
    pub const RESULT_CAP_MULTIPLIER: usize = 2;
}

/// Server and storage defaults
pub mod defaults {
    /// HTTP listen port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;

    /// HTTP bind address
    pub const DEFAULT_HOST: &str = "0.0.0.0";

    /// `SQLite` database location
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/nutrition.db";

    /// Connection pool size
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

    /// Whole-request timeout applied by the HTTP layer
    pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;
}
