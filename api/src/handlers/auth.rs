use axum::extract::State;
use axum::Json;
use axum_extra::extract::WithRejection;
use common::models::User;
use serde::Deserialize;

use crate::error::ApiError;
use crate::handlers::{require_fields, ApiResponse};
use crate::state::AppState;

/// Login body. Clients also send `password`; users have no stored
/// credential, so it is not read.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "userEmail", alias = "email")]
    pub user_email: Option<String>,
}

/// Login endpoint: a lookup by email, no token is issued
#[tracing::instrument(skip(state, req))]
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<ApiResponse<User>, ApiError> {
    require_fields(&[("userEmail", req.user_email.as_deref())])?;
    let email = req.user_email.unwrap_or_default();

    let user = state
        .users
        .find_by_email(email.trim())
        .await
        .map_err(|e| state.internal_error("Internal server error", &e))?
        .ok_or_else(|| {
            tracing::warn!("Login attempt with unknown email");
            ApiError::Unauthorized("Invalid email or password".to_string())
        })?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(ApiResponse::ok(user, "Login successful"))
}
