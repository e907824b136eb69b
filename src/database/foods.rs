// ABOUTME: Food record persistence in the fdc_foods table
// ABOUTME: Lookup by id, exact and partial description matching, single and bulk inserts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{Database, FoodStore, KeywordMatches};
use crate::errors::{AppError, AppResult};
use crate::models::{FoodNutrient, FoodRecord};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use tracing::{debug, info};

const SELECT_COLUMNS: &str = "fdc_id, description, food_category, brand_name, nutrients";

impl Database {
    /// Create the `fdc_foods` table
    pub(super) async fn migrate_foods(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS fdc_foods (
                fdc_id TEXT PRIMARY KEY,
                description TEXT NOT NULL,
                description_folded TEXT NOT NULL,
                food_category TEXT,
                brand_name TEXT,
                nutrients TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create fdc_foods table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_fdc_foods_description ON fdc_foods(description)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create fdc_foods index: {e}")))?;

        Ok(())
    }
}

fn row_to_food(row: &SqliteRow) -> AppResult<FoodRecord> {
    let nutrients_json: String = row.get("nutrients");
    let nutrients: Vec<FoodNutrient> = serde_json::from_str(&nutrients_json)?;

    Ok(FoodRecord {
        fdc_id: row.get("fdc_id"),
        description: row.get("description"),
        food_category: row.get("food_category"),
        brand_name: row.get("brand_name"),
        nutrients,
    })
}

/// Unicode lowercase form stored alongside the description
///
/// `SQLite` `LIKE` folds ASCII only, so partial matching compares folded text.
fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Escape `LIKE` wildcards so the keyword matches literally
fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Insert one row unless the id is already cached
///
/// Returns whether a row was written.
async fn insert_food(conn: &mut SqliteConnection, record: &FoodRecord) -> Result<bool, sqlx::Error> {
    let nutrients = serde_json::to_string(&record.nutrients)
        .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    let result = sqlx::query(
        r"
        INSERT INTO fdc_foods
            (fdc_id, description, description_folded, food_category, brand_name, nutrients, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(fdc_id) DO NOTHING
        ",
    )
    .bind(&record.fdc_id)
    .bind(&record.description)
    .bind(fold_case(&record.description))
    .bind(&record.food_category)
    .bind(&record.brand_name)
    .bind(nutrients)
    .bind(Utc::now().to_rfc3339())
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[async_trait]
impl FoodStore for Database {
    async fn get_by_id(&self, fdc_id: &str) -> AppResult<Option<FoodRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM fdc_foods WHERE fdc_id = ?1"
        ))
        .bind(fdc_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get food {fdc_id}: {e}")))?;

        row.as_ref().map(row_to_food).transpose()
    }

    async fn find_by_keyword(&self, keyword: &str, limit: usize) -> AppResult<KeywordMatches> {
        let exact_rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM fdc_foods WHERE description = ?1 ORDER BY rowid"
        ))
        .bind(keyword)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to match foods by description: {e}")))?;

        let partial_rows = sqlx::query(&format!(
            r"
            SELECT {SELECT_COLUMNS} FROM fdc_foods
            WHERE description_folded LIKE ?1 ESCAPE '\'
            ORDER BY rowid
            LIMIT ?2
            "
        ))
        .bind(like_pattern(&fold_case(keyword)))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to search foods by keyword: {e}")))?;

        Ok(KeywordMatches {
            exact: exact_rows
                .iter()
                .map(row_to_food)
                .collect::<AppResult<_>>()?,
            partial: partial_rows
                .iter()
                .map(row_to_food)
                .collect::<AppResult<_>>()?,
        })
    }

    async fn bulk_insert(&self, records: Vec<FoodRecord>) -> AppResult<Vec<FoodRecord>> {
        if records.is_empty() {
            return Ok(records);
        }

        let mut conn = self.pool.acquire().await.map_err(|e| {
            AppError::database(format!("Failed to acquire connection for bulk insert: {e}"))
        })?;

        let attempted = records.len();
        let mut inserted = Vec::with_capacity(attempted);
        for record in records {
            match insert_food(&mut conn, &record).await {
                Ok(true) => inserted.push(record),
                Ok(false) => debug!(fdc_id = %record.fdc_id, "Food already cached, skipping"),
                Err(e) => {
                    info!(fdc_id = %record.fdc_id, error = %e, "Skipping food that failed to insert");
                }
            }
        }

        if inserted.len() < attempted {
            info!(
                attempted,
                inserted = inserted.len(),
                "Bulk insert completed with skipped records"
            );
        }
        Ok(inserted)
    }

    async fn insert_one(&self, record: &FoodRecord) -> AppResult<()> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            AppError::database(format!("Failed to acquire connection for insert: {e}"))
        })?;

        let inserted = insert_food(&mut conn, record).await.map_err(|e| {
            AppError::database(format!("Failed to insert food {}: {e}", record.fdc_id))
        })?;

        if inserted {
            Ok(())
        } else {
            Err(AppError::already_exists(format!(
                "Food with FDC ID {}",
                record.fdc_id
            )))
        }
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM fdc_foods")
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::{fold_case, like_pattern};

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("egg"), "%egg%");
        assert_eq!(like_pattern("100%_juice"), r"%100\%\_juice%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }

    #[test]
    fn test_fold_case_handles_accented_letters() {
        assert_eq!(fold_case("CRÈME Brûlée"), "crème brûlée");
        assert_eq!(fold_case("Éclair"), fold_case("éCLAIR"));
    }
}
