// ABOUTME: Cache-first resolution of food lookups and keyword searches against USDA FoodData Central
// ABOUTME: Coordinates the food store, call ledger, quota throttle, upstream client, and normalizer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Nutrition Sync Service
//!
//! Two entry points:
//!
//! - [`NutritionSyncService::resolve_by_id`]: cache hit returns immediately;
//!   a miss goes upstream unless throttled, and upstream failures propagate.
//! - [`NutritionSyncService::resolve_by_keyword`]: answers from cache when
//!   there are enough exact matches, the keyword was searched before, or the
//!   throttle is closed. Otherwise it searches upstream once, records the
//!   keyword, and caches what came back. Upstream failures degrade to the
//!   cached answer and never fail the request.
//!
//! Concurrent identical searches may both reach upstream; duplicate ids are
//! absorbed by [`FoodStore::bulk_insert`].

use super::normalizer::{normalize, UpstreamFood};
use super::throttle::ThrottleController;
use crate::config::SearchConfig;
use crate::constants::{fdc, search};
use crate::database::{CallLedger, FoodStore, KeywordMatches};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::external::FoodDataClient;
use crate::models::FoodRecord;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Row counts reported by the health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Records in the food cache
    pub cached_foods: u64,
    /// Keywords searched upstream so far
    pub searched_keywords: u64,
}

/// Cache-first nutrition data resolver
pub struct NutritionSyncService {
    store: Arc<dyn FoodStore>,
    ledger: Arc<dyn CallLedger>,
    client: Arc<dyn FoodDataClient>,
    throttle: Arc<ThrottleController>,
    search: SearchConfig,
}

impl NutritionSyncService {
    /// Assemble the service from its collaborators
    #[must_use]
    pub fn new(
        store: Arc<dyn FoodStore>,
        ledger: Arc<dyn CallLedger>,
        client: Arc<dyn FoodDataClient>,
        throttle: Arc<ThrottleController>,
        search: SearchConfig,
    ) -> Self {
        Self {
            store,
            ledger,
            client,
            throttle,
            search,
        }
    }

    /// The quota throttle consulted before upstream calls
    #[must_use]
    pub const fn throttle(&self) -> &Arc<ThrottleController> {
        &self.throttle
    }

    /// Configured exact-match limit for keyword searches
    #[must_use]
    pub const fn result_limit(&self) -> usize {
        self.search.result_limit
    }

    /// Resolve one food by `FoodData` Central ID
    ///
    /// # Errors
    ///
    /// - `ExternalRateLimited` when the id is not cached and the throttle is closed
    /// - `ResourceNotFound` when upstream does not know the id
    /// - any upstream transport or decode failure
    /// - store failures
    #[instrument(skip(self))]
    pub async fn resolve_by_id(&self, fdc_id: &str) -> AppResult<FoodRecord> {
        if let Some(record) = self.store.get_by_id(fdc_id).await? {
            debug!("Food served from cache");
            return Ok(record);
        }

        if self.throttle.is_throttled() {
            info!("Food not cached and upstream calls are throttled");
            return Err(AppError::rate_limited(fdc::SERVICE_NAME));
        }

        let reply = self
            .client
            .get_food(fdc_id)
            .await
            .inspect_err(|e| self.note_upstream_rejection(e))?;
        self.throttle.report_quota(reply.rate_limit_remaining);

        let record = normalize(UpstreamFood::Lookup(reply.body));
        match self.store.insert_one(&record).await {
            Ok(()) => debug!("Food fetched upstream and cached"),
            Err(e) if e.code == ErrorCode::ResourceAlreadyExists => {
                debug!("Food cached concurrently by another request");
            }
            Err(e) => return Err(e),
        }
        Ok(record)
    }

    /// Resolve a keyword to at most `2 * limit` foods
    ///
    /// Exact description matches come first, then partial matches, then
    /// foods newly fetched from upstream, without duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank keyword and propagates store read
    /// failures. Upstream failures never surface here.
    #[instrument(skip(self))]
    pub async fn resolve_by_keyword(&self, keyword: &str, limit: usize) -> AppResult<Vec<FoodRecord>> {
        if keyword.trim().is_empty() {
            return Err(AppError::invalid_input("Search keyword cannot be empty"));
        }

        let limit = limit.max(1);
        let cap = limit.saturating_mul(search::RESULT_CAP_MULTIPLIER);
        let cached = self.store.find_by_keyword(keyword, cap).await?;

        if cached.exact.len() >= limit {
            debug!(exact = cached.exact.len(), "Enough exact matches in cache");
            return Ok(Self::cached_only(cached, cap));
        }
        if self.ledger.has_searched(keyword).await? {
            debug!("Keyword already searched upstream, serving cache");
            return Ok(Self::cached_only(cached, cap));
        }
        if self.throttle.is_throttled() {
            info!("Upstream calls are throttled, serving cache");
            return Ok(Self::cached_only(cached, cap));
        }

        let page_size = self.page_size_for(cap);
        let reply = match self.client.search_foods(keyword, page_size).await {
            Ok(reply) => reply,
            Err(e) => {
                self.note_upstream_rejection(&e);
                warn!(error = %e, "Upstream search failed, serving cache");
                return Ok(Self::cached_only(cached, cap));
            }
        };

        if let Err(e) = self.ledger.record_search(keyword).await {
            warn!(error = %e, "Failed to record keyword in call ledger");
        }
        self.throttle.report_quota(reply.rate_limit_remaining);

        let fetched: Vec<FoodRecord> = reply
            .body
            .into_iter()
            .map(|item| normalize(UpstreamFood::Search(item)))
            .collect();
        let fetched_count = fetched.len();

        let inserted = match self.store.bulk_insert(fetched).await {
            Ok(inserted) => inserted,
            Err(e) => {
                warn!(error = %e, "Failed to cache upstream results, serving cache");
                return Ok(Self::cached_only(cached, cap));
            }
        };

        info!(
            fetched = fetched_count,
            inserted = inserted.len(),
            "Keyword search synced from upstream"
        );
        Ok(merge_unique([cached.exact, cached.partial, inserted], cap))
    }

    /// Cache and ledger sizes
    ///
    /// # Errors
    ///
    /// Returns an error if either count query fails
    pub async fn cache_stats(&self) -> AppResult<CacheStats> {
        Ok(CacheStats {
            cached_foods: self.store.count().await?,
            searched_keywords: self.ledger.count().await?,
        })
    }

    fn cached_only(cached: KeywordMatches, cap: usize) -> Vec<FoodRecord> {
        merge_unique([cached.exact, cached.partial], cap)
    }

    /// Upstream page size: at least the result cap, within the provider maximum
    fn page_size_for(&self, cap: usize) -> u32 {
        let cap = u32::try_from(cap).unwrap_or(u32::MAX);
        self.search
            .page_size
            .max(cap)
            .min(fdc::MAX_SEARCH_PAGE_SIZE)
    }

    /// An upstream 429 means the quota is spent even without a header
    fn note_upstream_rejection(&self, error: &AppError) {
        if error.code == ErrorCode::ExternalRateLimited {
            self.throttle.report_quota(Some(0));
        }
    }
}

/// Concatenate groups, keeping the first occurrence of each id, up to `cap`
fn merge_unique<const N: usize>(groups: [Vec<FoodRecord>; N], cap: usize) -> Vec<FoodRecord> {
    let mut seen = HashSet::new();
    groups
        .into_iter()
        .flatten()
        .filter(|record| seen.insert(record.fdc_id.clone()))
        .take(cap)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> FoodRecord {
        FoodRecord {
            fdc_id: id.to_owned(),
            description: format!("Food {id}"),
            food_category: None,
            brand_name: None,
            nutrients: Vec::new(),
        }
    }

    #[test]
    fn test_merge_keeps_first_occurrence_order() {
        let merged = merge_unique(
            [
                vec![record("1")],
                vec![record("1"), record("2")],
                vec![record("3"), record("2")],
            ],
            10,
        );
        let ids: Vec<_> = merged.iter().map(|r| r.fdc_id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_merge_truncates_to_cap() {
        let merged = merge_unique([vec![record("1"), record("2"), record("3")]], 2);
        assert_eq!(merged.len(), 2);
    }
}
