// ABOUTME: USDA FoodData Central API client for nutritional data retrieval
// ABOUTME: Implements keyword search, lookup by id, quota header capture, and a mock client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! USDA `FoodData` Central API Client
//!
//! Thin transport over the two endpoints the nutrition engine needs:
//!
//! - `GET {base}/foods/search?query=..&dataType=Branded&pageSize=..&api_key=..`
//! - `GET {base}/food/{fdcId}?api_key=..`
//!
//! Every successful reply carries the `x-ratelimit-remaining` header value so
//! the caller can feed it to the quota throttle. This client does no caching
//! and no rate limiting of its own; both live in the sync layer.
//!
//! # API Reference
//! USDA `FoodData` Central API: <https://fdc.nal.usda.gov/api-guide.html>

use crate::config::FdcApiConfig;
use crate::constants::fdc;
use crate::errors::{AppError, AppResult, ErrorCode};
use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Upstream response body paired with the quota header
#[derive(Debug, Clone)]
pub struct UpstreamReply<T> {
    /// Decoded response body
    pub body: T,
    /// Value of `x-ratelimit-remaining`, when present and numeric
    pub rate_limit_remaining: Option<u32>,
}

/// Item returned by the search endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFoodItem {
    /// `FoodData` Central ID
    pub fdc_id: u64,
    /// Raw description, usually upper case
    #[serde(default)]
    pub description: Option<String>,
    /// Food category
    #[serde(default)]
    pub food_category: Option<String>,
    /// Category used by branded items when `food_category` is absent
    #[serde(default)]
    pub branded_food_category: Option<String>,
    /// Brand name
    #[serde(default)]
    pub brand_name: Option<String>,
    /// Brand owner, used when `brand_name` is absent
    #[serde(default)]
    pub brand_owner: Option<String>,
    /// Flat nutrient list
    #[serde(default)]
    pub food_nutrients: Vec<SearchNutrient>,
}

/// Nutrient entry in a search item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchNutrient {
    /// Nutrient identifier
    #[serde(default)]
    pub nutrient_id: Option<u64>,
    /// Nutrient name
    #[serde(default)]
    pub nutrient_name: Option<String>,
    /// Unit name
    #[serde(default)]
    pub unit_name: Option<String>,
    /// Amount
    #[serde(default)]
    pub value: Option<f64>,
}

/// Item returned by the lookup endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupFoodItem {
    /// `FoodData` Central ID
    pub fdc_id: u64,
    /// Raw description
    #[serde(default)]
    pub description: Option<String>,
    /// Category, either a plain string or a `{ "description": .. }` object
    #[serde(default)]
    pub food_category: Option<CategoryField>,
    /// Category used by branded items
    #[serde(default)]
    pub branded_food_category: Option<String>,
    /// Brand name
    #[serde(default)]
    pub brand_name: Option<String>,
    /// Brand owner
    #[serde(default)]
    pub brand_owner: Option<String>,
    /// Nested nutrient list
    #[serde(default)]
    pub food_nutrients: Vec<LookupNutrient>,
}

/// Food category as returned by the lookup endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryField {
    /// Plain category text
    Text(String),
    /// Category object
    Described {
        /// Category text
        #[serde(default)]
        description: Option<String>,
    },
}

impl CategoryField {
    /// Category text regardless of shape
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Described { description } => description.as_deref(),
        }
    }
}

/// Nutrient entry in a lookup item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupNutrient {
    /// Nutrient metadata
    #[serde(default)]
    pub nutrient: Option<NutrientInfo>,
    /// Amount
    #[serde(default)]
    pub amount: Option<f64>,
}

/// Nutrient metadata nested in a lookup nutrient entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientInfo {
    /// Nutrient identifier
    pub id: u64,
    /// Nutrient name
    #[serde(default)]
    pub name: Option<String>,
    /// Unit name
    #[serde(default)]
    pub unit_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFoodItem>,
}

/// Transport to the upstream food database
#[async_trait]
pub trait FoodDataClient: Send + Sync {
    /// Search branded foods matching `query`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or a body
    /// that cannot be decoded
    async fn search_foods(
        &self,
        query: &str,
        page_size: u32,
    ) -> AppResult<UpstreamReply<Vec<SearchFoodItem>>>;

    /// Fetch one food by `FoodData` Central ID
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown id, otherwise as for search
    async fn get_food(&self, fdc_id: &str) -> AppResult<UpstreamReply<LookupFoodItem>>;
}

/// USDA `FoodData` Central API Client
pub struct UsdaClient {
    config: FdcApiConfig,
    http_client: reqwest::Client,
}

impl UsdaClient {
    /// Create a new USDA API client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    pub fn new(config: FdcApiConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build USDA HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Extract the quota header, ignoring absent or non-numeric values
    fn rate_limit_remaining(response: &Response) -> Option<u32> {
        response
            .headers()
            .get(fdc::RATE_LIMIT_REMAINING_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
    }

    /// Map a transport failure without leaking the keyed URL
    fn transport_error(error: reqwest::Error) -> AppError {
        let error = error.without_url();
        if error.is_timeout() {
            AppError::external_unavailable(fdc::SERVICE_NAME, format!("request timed out: {error}"))
                .with_source(error)
        } else if error.is_connect() {
            AppError::external_unavailable(fdc::SERVICE_NAME, format!("connection failed: {error}"))
                .with_source(error)
        } else {
            AppError::external_service(fdc::SERVICE_NAME, error.to_string()).with_source(error)
        }
    }

    /// Turn a non-success status into an error
    async fn status_error(response: Response, fdc_id: Option<&str>) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => fdc_id.map_or_else(
                || AppError::external_service(fdc::SERVICE_NAME, format!("HTTP {status}: {body}")),
                |id| AppError::not_found(format!("Food with FDC ID {id}")),
            ),
            StatusCode::TOO_MANY_REQUESTS => AppError::new(
                ErrorCode::ExternalRateLimited,
                format!("{}: HTTP {status}: {body}", fdc::SERVICE_NAME),
            ),
            _ => AppError::external_service(fdc::SERVICE_NAME, format!("HTTP {status}: {body}")),
        }
    }
}

#[async_trait]
impl FoodDataClient for UsdaClient {
    async fn search_foods(
        &self,
        query: &str,
        page_size: u32,
    ) -> AppResult<UpstreamReply<Vec<SearchFoodItem>>> {
        if query.trim().is_empty() {
            return Err(AppError::invalid_input("Search query cannot be empty"));
        }

        if page_size == 0 || page_size > fdc::MAX_SEARCH_PAGE_SIZE {
            return Err(AppError::invalid_input(format!(
                "Page size must be between 1 and {}",
                fdc::MAX_SEARCH_PAGE_SIZE
            )));
        }

        debug!(query, page_size, "Searching USDA FoodData Central");
        let response = self
            .http_client
            .get(self.endpoint("foods/search"))
            .query(&[
                ("query", query),
                ("dataType", fdc::SEARCH_DATA_TYPE),
                ("pageSize", &page_size.to_string()),
                ("api_key", &self.config.api_key),
            ])
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(Self::status_error(response, None).await);
        }

        let rate_limit_remaining = Self::rate_limit_remaining(&response);
        let search_response: SearchResponse = response.json().await.map_err(|e| {
            AppError::external_service(fdc::SERVICE_NAME, format!("JSON parse error: {e}"))
        })?;

        debug!(
            query,
            results = search_response.foods.len(),
            rate_limit_remaining,
            "USDA search completed"
        );
        Ok(UpstreamReply {
            body: search_response.foods,
            rate_limit_remaining,
        })
    }

    async fn get_food(&self, fdc_id: &str) -> AppResult<UpstreamReply<LookupFoodItem>> {
        if fdc_id.is_empty() || !fdc_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::invalid_input(format!(
                "FDC ID must be numeric, got '{fdc_id}'"
            )));
        }

        debug!(fdc_id, "Fetching food from USDA FoodData Central");
        let response = self
            .http_client
            .get(self.endpoint(&format!("food/{fdc_id}")))
            .query(&[("api_key", &self.config.api_key)])
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            let error = Self::status_error(response, Some(fdc_id)).await;
            if error.code != ErrorCode::ResourceNotFound {
                warn!(fdc_id, error = %error, "USDA lookup failed");
            }
            return Err(error);
        }

        let rate_limit_remaining = Self::rate_limit_remaining(&response);
        let food: LookupFoodItem = response.json().await.map_err(|e| {
            AppError::external_service(fdc::SERVICE_NAME, format!("JSON parse error: {e}"))
        })?;

        Ok(UpstreamReply {
            body: food,
            rate_limit_remaining,
        })
    }
}

/// Mock USDA client for testing (no API calls)
///
/// Search returns the configured items whose description contains the query
/// (case-insensitive), truncated to the page size. Lookup returns configured
/// items by id. Every call is counted.
#[derive(Default)]
pub struct MockFoodDataClient {
    search_items: Vec<SearchFoodItem>,
    lookup_items: HashMap<String, LookupFoodItem>,
    rate_limit_remaining: Mutex<Option<u32>>,
    failure: Mutex<Option<ErrorCode>>,
    search_calls: AtomicUsize,
    lookup_calls: AtomicUsize,
    page_sizes: Mutex<Vec<u32>>,
}

impl MockFoodDataClient {
    /// Create an empty mock client
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Items the search endpoint can return
    #[must_use]
    pub fn with_search_items(mut self, items: Vec<SearchFoodItem>) -> Self {
        self.search_items = items;
        self
    }

    /// Add an item the lookup endpoint can return
    #[must_use]
    pub fn with_lookup_item(mut self, item: LookupFoodItem) -> Self {
        self.lookup_items.insert(item.fdc_id.to_string(), item);
        self
    }

    /// Quota header value attached to every reply
    #[must_use]
    pub fn with_rate_limit_remaining(self, remaining: Option<u32>) -> Self {
        self.set_rate_limit_remaining(remaining);
        self
    }

    /// Change the quota header value for subsequent replies
    pub fn set_rate_limit_remaining(&self, remaining: Option<u32>) {
        *self
            .rate_limit_remaining
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = remaining;
    }

    /// Make every subsequent call fail with `code` (or succeed again with `None`)
    pub fn set_failure(&self, code: Option<ErrorCode>) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = code;
    }

    /// Number of search calls received
    #[must_use]
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Number of lookup calls received
    #[must_use]
    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    /// Page sizes requested by search calls, in call order
    #[must_use]
    pub fn requested_page_sizes(&self) -> Vec<u32> {
        self.page_sizes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn current_rate_limit(&self) -> Option<u32> {
        *self
            .rate_limit_remaining
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn injected_failure(&self) -> AppResult<()> {
        let failure = *self.failure.lock().unwrap_or_else(PoisonError::into_inner);
        failure.map_or(Ok(()), |code| {
            Err(AppError::new(
                code,
                format!("{}: injected failure", fdc::SERVICE_NAME),
            ))
        })
    }
}

#[async_trait]
impl FoodDataClient for MockFoodDataClient {
    async fn search_foods(
        &self,
        query: &str,
        page_size: u32,
    ) -> AppResult<UpstreamReply<Vec<SearchFoodItem>>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.page_sizes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(page_size);
        self.injected_failure()?;

        if query.trim().is_empty() {
            return Err(AppError::invalid_input("Search query cannot be empty"));
        }

        let query_lower = query.to_lowercase();
        let body = self
            .search_items
            .iter()
            .filter(|item| {
                item.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&query_lower))
            })
            .take(page_size as usize)
            .cloned()
            .collect();

        Ok(UpstreamReply {
            body,
            rate_limit_remaining: self.current_rate_limit(),
        })
    }

    async fn get_food(&self, fdc_id: &str) -> AppResult<UpstreamReply<LookupFoodItem>> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.injected_failure()?;

        let body = self
            .lookup_items
            .get(fdc_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Food with FDC ID {fdc_id}")))?;

        Ok(UpstreamReply {
            body,
            rate_limit_remaining: self.current_rate_limit(),
        })
    }
}
