// ABOUTME: Keyword-call ledger in the fdc_keyword_calls table
// ABOUTME: Records which keywords were already searched upstream so they are never repeated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{CallLedger, Database};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;

impl Database {
    /// Create the `fdc_keyword_calls` table
    pub(super) async fn migrate_call_ledger(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS fdc_keyword_calls (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                keyword TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to create fdc_keyword_calls table: {e}"))
        })?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_fdc_keyword_calls_keyword ON fdc_keyword_calls(keyword)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to create fdc_keyword_calls index: {e}"))
        })?;

        Ok(())
    }
}

#[async_trait]
impl CallLedger for Database {
    async fn has_searched(&self, keyword: &str) -> AppResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM fdc_keyword_calls WHERE keyword = ?1 LIMIT 1")
                .bind(keyword)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to check keyword ledger: {e}")))?;

        Ok(found.is_some())
    }

    async fn record_search(&self, keyword: &str) -> AppResult<()> {
        sqlx::query("INSERT INTO fdc_keyword_calls (keyword, created_at) VALUES (?1, ?2)")
            .bind(keyword)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to record keyword search: {e}")))?;

        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM fdc_keyword_calls")
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}
