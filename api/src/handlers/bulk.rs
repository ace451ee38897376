use axum::extract::State;
use common::models::ImportSummary;

use crate::error::ApiError;
use crate::handlers::ApiResponse;
use crate::state::AppState;

/// Replace the users table with the placeholder source's users
#[tracing::instrument(skip(state))]
pub async fn import_users(
    State(state): State<AppState>,
) -> Result<ApiResponse<ImportSummary>, ApiError> {
    let summary = state
        .bulk
        .import_users()
        .await
        .map_err(|e| state.internal_error("Failed to import user data", &e))?;

    let message = format!("Imported {} users", summary.rows);
    Ok(ApiResponse::ok(summary, message))
}

/// Replace the posts table with the placeholder source's posts
#[tracing::instrument(skip(state))]
pub async fn import_posts(
    State(state): State<AppState>,
) -> Result<ApiResponse<ImportSummary>, ApiError> {
    let summary = state
        .bulk
        .import_posts()
        .await
        .map_err(|e| state.internal_error("Failed to import post data", &e))?;

    let message = format!("Imported {} posts", summary.rows);
    Ok(ApiResponse::ok(summary, message))
}

/// Empty both tables
#[tracing::instrument(skip(state))]
pub async fn delete_all_records(
    State(state): State<AppState>,
) -> Result<ApiResponse<()>, ApiError> {
    state
        .bulk
        .delete_all()
        .await
        .map_err(|e| state.internal_error("Failed to delete records", &e))?;

    Ok(ApiResponse::message("All records deleted successfully"))
}
