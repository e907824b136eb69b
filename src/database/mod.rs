// ABOUTME: SQLite persistence for cached foods and the upstream keyword-call ledger
// ABOUTME: Defines the FoodStore and CallLedger seams plus the Database pool and migrations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! Two tables back the nutrition cache:
//!
//! - `fdc_foods`: one row per `FoodData` Central item, keyed by `fdc_id`
//! - `fdc_keyword_calls`: append-only log of keywords already searched upstream
//!
//! The sync layer talks to them through the [`FoodStore`] and [`CallLedger`]
//! traits so tests can substitute either side.

mod call_ledger;
mod foods;

use crate::config::{DatabaseConfig, DatabaseUrl};
use crate::errors::{AppError, AppResult};
use crate::models::FoodRecord;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::info;

/// Result of a keyword lookup against the cache
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordMatches {
    /// Records whose description equals the keyword exactly
    pub exact: Vec<FoodRecord>,
    /// Records whose description contains the keyword, ignoring case
    pub partial: Vec<FoodRecord>,
}

/// Persistent cache of normalized food records
#[async_trait]
pub trait FoodStore: Send + Sync {
    /// Fetch one record by `FoodData` Central ID
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    async fn get_by_id(&self, fdc_id: &str) -> AppResult<Option<FoodRecord>>;

    /// Exact and partial description matches, partial capped at `limit`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    async fn find_by_keyword(&self, keyword: &str, limit: usize) -> AppResult<KeywordMatches>;

    /// Insert many records, skipping those that fail individually
    ///
    /// Returns the records that were actually inserted, in input order.
    ///
    /// # Errors
    ///
    /// Returns an error only when the store as a whole is unavailable
    async fn bulk_insert(&self, records: Vec<FoodRecord>) -> AppResult<Vec<FoodRecord>>;

    /// Insert one record
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` for a duplicate id, `DatabaseError` otherwise
    async fn insert_one(&self, record: &FoodRecord) -> AppResult<()>;

    /// Number of cached records
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    async fn count(&self) -> AppResult<u64>;
}

/// Log of keywords already searched upstream
#[async_trait]
pub trait CallLedger: Send + Sync {
    /// Whether `keyword` was searched upstream before
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    async fn has_searched(&self, keyword: &str) -> AppResult<bool>;

    /// Append `keyword` to the ledger
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    async fn record_search(&self, keyword: &str) -> AppResult<()>;

    /// Number of ledger rows
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    async fn count(&self) -> AppResult<u64>;
}

/// `SQLite` database backing the nutrition cache
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open the database and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        let connection_string = config.url.to_connection_string();
        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::config_invalid("DATABASE_URL", e.to_string()))?
            .create_if_missing(true);

        let pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
        // Every in-memory connection is its own database; pin one for the pool lifetime
        let pool_options = if config.url.is_memory() {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options
        };

        if let DatabaseUrl::SQLite { path } = &config.url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::database(format!(
                        "Failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open {}: {e}", config.url)))?;

        let db = Self { pool };
        db.migrate().await?;

        info!(url = %config.url, "Nutrition database ready");
        Ok(db)
    }

    /// Open a fresh in-memory database
    ///
    /// # Errors
    ///
    /// Returns an error if migrations fail
    pub async fn in_memory() -> AppResult<Self> {
        Self::new(&DatabaseConfig {
            url: DatabaseUrl::Memory,
            max_connections: 1,
        })
        .await
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any schema statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_foods().await?;
        self.migrate_call_ledger().await?;
        Ok(())
    }
}
