//! API Handlers
//!
//! HTTP request handlers. Every handler goes through the [`Driver`] contract
//! only, so any registered backend can serve them.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;

use crate::config::Config;
use crate::driver::{Driver, Registry};
use crate::error::{Result, StorageError};
use crate::models::{
    GetResponse, HealthResponse, IntResponse, SetRequest, SetResponse, TtlResponse,
    UpgradeRequest, UpgradeResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The active storage driver
    pub driver: Arc<dyn Driver>,
    /// Name the driver was selected by
    pub driver_name: String,
    /// TTL applied when a write omits one
    pub default_ttl: i64,
}

impl AppState {
    /// Creates a new AppState around an initialized driver.
    pub fn new(driver: Arc<dyn Driver>, driver_name: impl Into<String>) -> Self {
        Self {
            driver,
            driver_name: driver_name.into(),
            default_ttl: 0,
        }
    }

    pub fn with_default_ttl(mut self, default_ttl: i64) -> Self {
        self.default_ttl = default_ttl;
        self
    }

    /// Resolves and initializes the configured driver.
    pub fn from_config(config: &Config, registry: &Registry) -> Result<Self> {
        let driver = registry.new_manager(&config.driver, &config.storage)?;
        Ok(Self::new(driver, config.driver.clone()).with_default_ttl(config.default_ttl))
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(StorageError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl.unwrap_or(state.default_ttl);
    if req.immutable {
        state.driver.write_immutable(&req.key, req.value, ttl);
    } else {
        state.driver.write(&req.key, req.value, ttl);
    }
    debug!(key = %req.key, ttl, immutable = req.immutable, "Key written");

    Ok(Json(SetResponse::new(req.key, req.immutable)))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.driver.read(&key)? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(StorageError::NotFound(key)),
    }
}

/// Handler for GET /int/:key
pub async fn int_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<IntResponse>> {
    let value = state.driver.read_int(&key)?;
    Ok(Json(IntResponse::new(key, value)))
}

/// Handler for GET /ttl/:key
pub async fn ttl_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<TtlResponse> {
    let ttl = state.driver.ttl(&key);
    Json(TtlResponse::new(key, ttl))
}

/// Handler for POST /upgrade/:key
///
/// Fails with 404 when the key is absent or holds a write-once entry.
pub async fn upgrade_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<UpgradeRequest>,
) -> Result<Json<UpgradeResponse>> {
    if !state.driver.upgrade(&key, req.ttl) {
        return Err(StorageError::NotFound(key));
    }
    Ok(Json(UpgradeResponse::new(key, req.ttl)))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.driver_name, state.driver.stats()))
}
