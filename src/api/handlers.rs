//! API Handlers
//!
//! HTTP request handlers for the cache and sieve endpoints.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::models::{
    CleanupResponse, ClearResponse, FilterRequest, FilterResponse, GetResponse, HealthResponse,
    KeyResponse, SetRequest,
};
use crate::sieve::{FilterSet, SievePage, SieveParams, SieveQuery};

/// Application state shared across all handlers.
///
/// Contains the cache store wrapped in Arc<RwLock<>> for shared access.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<RwLock<CacheStore>>,
}

impl AppState {
    /// Creates a new AppState with the given cache store.
    pub fn new(cache: CacheStore) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheStore::new(config.max_entries, config.default_ttl()))
    }
}

/// Handler for PUT /cache
///
/// Stores any JSON value under a key with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<KeyResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ServiceError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl_duration();
    let mut cache = state.cache.write().await;
    cache.set(req.key.clone(), req.value, ttl);

    Ok(Json(KeyResponse::set(req.key)))
}

/// Handler for GET /cache/:key
///
/// A stored `null` is a hit and comes back as `{"value": null}`.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    // Write lock: lookups update counters and may drop an expired entry
    let mut cache = state.cache.write().await;
    let value = cache
        .get(&key)
        .ok_or_else(|| ServiceError::NotFound(key.clone()))?;
    let ttl_ms = cache.ttl_remaining_ms(&key).unwrap_or(0);

    Ok(Json(GetResponse::new(key, value, ttl_ms)))
}

/// Handler for DELETE /cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<KeyResponse>> {
    let mut cache = state.cache.write().await;
    if !cache.delete(&key) {
        return Err(ServiceError::NotFound(key));
    }

    Ok(Json(KeyResponse::deleted(key)))
}

/// Handler for DELETE /cache
///
/// Drops every entry and resets the counters.
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.write().await.clear();

    Json(ClearResponse {
        message: "Cache cleared".to_string(),
    })
}

/// Handler for POST /cache/cleanup
///
/// Runs an expiry sweep on demand, outside the background schedule.
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<CleanupResponse> {
    let removed = state.cache.write().await.cleanup_expired();
    Json(CleanupResponse { removed })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    let cache = state.cache.read().await;
    Json(cache.stats())
}

/// Handler for POST /sieve
///
/// Applies `filters`, `sorts`, `page` and `pageSize` from the query string to
/// the JSON array in the body.
pub async fn sieve_handler(
    Query(params): Query<SieveParams>,
    Json(records): Json<Vec<Value>>,
) -> Json<SievePage> {
    let query = SieveQuery::from_params(&params);
    if !query.filters.is_satisfiable() {
        debug!(rejected = ?query.filters.rejected(), "sieve query contains unknown operators");
    }

    Json(query.apply(&records))
}

/// Handler for POST /filter
///
/// Evaluates JSON-supplied conditions and reports which of them could have
/// been pushed down to the document store.
pub async fn filter_handler(Json(req): Json<FilterRequest>) -> Json<FilterResponse> {
    let filters = FilterSet::from_raw(req.conditions);
    let items: Vec<Value> = filters.filter(&req.records).into_iter().cloned().collect();
    let (pushdown, local) = filters.split_pushdown();

    Json(FilterResponse {
        total: items.len(),
        items,
        pushdown: pushdown.into_iter().cloned().collect(),
        local: local.into_iter().cloned().collect(),
        rejected: filters.rejected().to_vec(),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn test_state() -> AppState {
        AppState::new(CacheStore::new(100, Duration::from_secs(300)))
    }

    fn set_request(key: &str, value: Value) -> SetRequest {
        SetRequest {
            key: key.to_string(),
            value,
            ttl: None,
        }
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state();

        let result = set_handler(
            State(state.clone()),
            Json(set_request("test_key", json!({"sku": "A1"}))),
        )
        .await;
        assert!(result.is_ok());

        let response = get_handler(State(state), Path("test_key".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value, json!({"sku": "A1"}));
    }

    #[tokio::test]
    async fn test_get_stored_null_is_hit() {
        let state = test_state();

        set_handler(State(state.clone()), Json(set_request("nothing", Value::Null)))
            .await
            .unwrap();

        let response = get_handler(State(state.clone()), Path("nothing".to_string()))
            .await
            .unwrap();
        assert!(response.value.is_null());
        assert_eq!(stats_handler(State(state)).await.hits, 1);
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let result = get_handler(State(test_state()), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state();

        set_handler(State(state.clone()), Json(set_request("to_delete", json!(1))))
            .await
            .unwrap();

        let result = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(result.is_ok());

        let result = delete_handler(State(state), Path("to_delete".to_string())).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_clear_handler_resets_stats() {
        let state = test_state();

        set_handler(State(state.clone()), Json(set_request("a", json!(1))))
            .await
            .unwrap();
        let _ = get_handler(State(state.clone()), Path("a".to_string())).await;
        let _ = get_handler(State(state.clone()), Path("b".to_string())).await;

        clear_handler(State(state.clone())).await;

        let stats = stats_handler(State(state)).await;
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[tokio::test]
    async fn test_cleanup_handler() {
        let state = test_state();
        state
            .cache
            .write()
            .await
            .set("short", json!(1), Some(Duration::from_millis(5)));

        tokio::time::sleep(Duration::from_millis(20)).await;

        let response = cleanup_handler(State(state)).await;
        assert_eq!(response.removed, 1);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let response = stats_handler(State(test_state())).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
        assert_eq!(response.max_size, 100);
    }

    #[tokio::test]
    async fn test_sieve_handler() {
        let params = SieveParams {
            filters: Some("price>=100".to_string()),
            sorts: Some("-price".to_string()),
            page: None,
            page_size: None,
        };
        let records = vec![json!({"price": 50}), json!({"price": 150}), json!({"price": 300})];

        let page = sieve_handler(Query(params), Json(records)).await;
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0]["price"], 300);
    }

    #[tokio::test]
    async fn test_filter_handler() {
        let req: FilterRequest = serde_json::from_value(json!({
            "conditions": [
                {"field": "price", "operator": ">=", "value": 100},
                {"field": "name", "operator": "@=*", "value": "laptop"}
            ],
            "records": [
                {"price": 300, "name": "Gaming Laptop"},
                {"price": 300, "name": "Phone"}
            ]
        }))
        .unwrap();

        let response = filter_handler(Json(req)).await;
        assert_eq!(response.total, 1);
        assert_eq!(response.pushdown.len(), 1);
        assert_eq!(response.local.len(), 1);
        assert!(response.rejected.is_empty());
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let result = set_handler(State(test_state()), Json(set_request("", json!(1)))).await;
        assert!(matches!(result, Err(ServiceError::InvalidRequest(_))));
    }
}
