use axum::extract::State;
use serde::Serialize;

use crate::error::ApiError;
use crate::handlers::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub database: &'static str,
    pub pool_size: u32,
    pub idle_connections: usize,
}

/// Health check endpoint; pings the database through the pool
#[tracing::instrument(skip(state))]
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<ApiResponse<HealthStatus>, ApiError> {
    state.db_pool.health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Health check failed");
        ApiError::ServiceUnavailable("Database unavailable".to_string())
    })?;

    let status = HealthStatus {
        database: "up",
        pool_size: state.db_pool.size(),
        idle_connections: state.db_pool.num_idle(),
    };
    Ok(ApiResponse::ok(status, "OK"))
}
