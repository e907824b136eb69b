// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses server, database, upstream API, throttle, and search settings from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management for production deployment

use crate::constants::{defaults, fdc, search, throttle};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path of the database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns an error if the URL names a backend other than `SQLite`
    pub fn parse_url(s: &str) -> AppResult<Self> {
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            let path_str = path_str.trim_start_matches("//");
            if path_str == ":memory:" {
                Ok(Self::Memory)
            } else if path_str.is_empty() {
                Err(AppError::config_invalid(
                    "DATABASE_URL",
                    "sqlite URL has no path",
                ))
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path_str),
                })
            }
        } else if s.contains("://") {
            Err(AppError::config_invalid(
                "DATABASE_URL",
                format!("unsupported database backend in '{s}'"),
            ))
        } else {
            // Bare path: treat as SQLite file
            Ok(Self::SQLite {
                path: PathBuf::from(s),
            })
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/nutrition.db"),
        }
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// HTTP listener settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Bind address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Whole-request timeout
    pub request_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_owned(),
            port: defaults::DEFAULT_HTTP_PORT,
            request_timeout: Duration::from_secs(defaults::HTTP_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Database settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
    /// Connection pool size
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DatabaseUrl::default(),
            max_connections: defaults::DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// USDA `FoodData` Central API settings
#[derive(Clone)]
pub struct FdcApiConfig {
    /// API key sent as the `api_key` query parameter
    pub api_key: String,
    /// Base URL without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl FdcApiConfig {
    /// Settings for the production endpoint with the given key
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: fdc::DEFAULT_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(fdc::DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

// The API key must never reach logs
impl fmt::Debug for FdcApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FdcApiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Quota protection settings
#[derive(Debug, Clone, Copy)]
pub struct ThrottleConfig {
    /// Remaining-quota value below which upstream calls are suspended
    pub safety_threshold: u32,
    /// Suspension length
    pub cooldown: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            safety_threshold: throttle::DEFAULT_QUOTA_SAFETY_THRESHOLD,
            cooldown: Duration::from_secs(throttle::DEFAULT_COOLDOWN_SECS),
        }
    }
}

/// Keyword search sizing
#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    /// Exact-match count that satisfies a search from cache
    pub result_limit: usize,
    /// Page size requested from the upstream search endpoint
    pub page_size: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_limit: search::DEFAULT_RESULT_LIMIT,
            page_size: fdc::DEFAULT_SEARCH_PAGE_SIZE,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listener
    pub http: HttpConfig,
    /// Storage
    pub database: DatabaseConfig,
    /// Upstream API
    pub fdc: FdcApiConfig,
    /// Quota protection
    pub throttle: ThrottleConfig,
    /// Keyword search sizing
    pub search: SearchConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `FDC_API_KEY` is unset or any value fails to parse
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let api_key = env::var("FDC_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::config_missing("FDC_API_KEY"))?;

        let config = Self {
            http: HttpConfig {
                host: env_var_or("HOST", defaults::DEFAULT_HOST),
                port: parse_env("HTTP_PORT", defaults::DEFAULT_HTTP_PORT)?,
                request_timeout: Duration::from_secs(parse_env(
                    "HTTP_REQUEST_TIMEOUT_SECS",
                    defaults::HTTP_REQUEST_TIMEOUT_SECS,
                )?),
            },
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or(
                    "DATABASE_URL",
                    defaults::DEFAULT_DATABASE_URL,
                ))?,
                max_connections: parse_env(
                    "DATABASE_MAX_CONNECTIONS",
                    defaults::DEFAULT_MAX_CONNECTIONS,
                )?,
            },
            fdc: FdcApiConfig {
                api_key,
                base_url: env_var_or("FDC_API_URL", fdc::DEFAULT_BASE_URL)
                    .trim_end_matches('/')
                    .to_owned(),
                request_timeout: Duration::from_secs(parse_env(
                    "FDC_REQUEST_TIMEOUT_SECS",
                    fdc::DEFAULT_REQUEST_TIMEOUT_SECS,
                )?),
            },
            throttle: ThrottleConfig {
                safety_threshold: parse_env(
                    "FDC_QUOTA_SAFETY_THRESHOLD",
                    throttle::DEFAULT_QUOTA_SAFETY_THRESHOLD,
                )?,
                cooldown: Duration::from_secs(parse_env(
                    "FDC_THROTTLE_COOLDOWN_SECS",
                    throttle::DEFAULT_COOLDOWN_SECS,
                )?),
            },
            search: SearchConfig {
                result_limit: parse_env("NUTRITION_SEARCH_LIMIT", search::DEFAULT_RESULT_LIMIT)?,
                page_size: parse_env("FDC_SEARCH_PAGE_SIZE", fdc::DEFAULT_SEARCH_PAGE_SIZE)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns a `ConfigInvalid` error naming the first offending variable
    pub fn validate(&self) -> AppResult<()> {
        url::Url::parse(&self.fdc.base_url)
            .map_err(|e| AppError::config_invalid("FDC_API_URL", e.to_string()))?;

        if self.fdc.request_timeout.is_zero() {
            return Err(AppError::config_invalid(
                "FDC_REQUEST_TIMEOUT_SECS",
                "must be greater than zero",
            ));
        }
        if self.throttle.cooldown.is_zero() {
            return Err(AppError::config_invalid(
                "FDC_THROTTLE_COOLDOWN_SECS",
                "must be greater than zero",
            ));
        }
        if self.search.result_limit == 0 {
            return Err(AppError::config_invalid(
                "NUTRITION_SEARCH_LIMIT",
                "must be at least 1",
            ));
        }
        if self.search.page_size == 0 || self.search.page_size > fdc::MAX_SEARCH_PAGE_SIZE {
            return Err(AppError::config_invalid(
                "FDC_SEARCH_PAGE_SIZE",
                format!("must be between 1 and {}", fdc::MAX_SEARCH_PAGE_SIZE),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(AppError::config_invalid(
                "DATABASE_MAX_CONNECTIONS",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Human-readable configuration summary (never includes the API key)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Recipebook Nutrition Configuration:\n\
             - HTTP: {}:{}\n\
             - Database: {}\n\
             - USDA API: {}\n\
             - Upstream Timeout: {}s\n\
             - Quota Safety Threshold: {}\n\
             - Throttle Cooldown: {}s\n\
             - Search Limit: {}\n\
             - Search Page Size: {}",
            self.http.host,
            self.http.port,
            self.database.url,
            self.fdc.base_url,
            self.fdc.request_timeout.as_secs(),
            self.throttle.safety_threshold,
            self.throttle.cooldown.as_secs(),
            self.search.result_limit,
            self.search.page_size,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| AppError::config_invalid(key, format!("'{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}
