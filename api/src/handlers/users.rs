use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::WithRejection;
use common::models::{Address, Company, NewUser, User, UserChanges};
use serde::Deserialize;

use crate::error::ApiError;
use crate::handlers::{parse_id, require_fields, ApiResponse};
use crate::state::AppState;

/// Profile fields accepted by create and update
#[derive(Debug, Deserialize)]
pub struct UserRequest {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub company: Option<Company>,
}

impl UserRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_fields(&[
            ("name", self.name.as_deref()),
            ("username", self.username.as_deref()),
            ("email", self.email.as_deref()),
        ])?;
        Ok(())
    }
}

const USER_NOT_FOUND: &str = "User not found";

/// List all users
#[tracing::instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<ApiResponse<Vec<User>>, ApiError> {
    let users = state
        .users
        .find_all()
        .await
        .map_err(|e| state.internal_error("Failed to load the user list", &e))?;

    let message = format!("Loaded {} users", users.len());
    Ok(ApiResponse::ok(users, message))
}

/// Get user by ID
#[tracing::instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    WithRejection(Path(raw_id), _): WithRejection<Path<String>, ApiError>,
) -> Result<ApiResponse<User>, ApiError> {
    let user_id = parse_id(&raw_id, USER_NOT_FOUND)?;
    let user = state
        .users
        .find_by_id(user_id)
        .await
        .map_err(|e| state.internal_error("Failed to load the user", &e))?
        .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))?;

    Ok(ApiResponse::ok(user, "User loaded"))
}

/// Create a user; the id is taken from the body when given
#[tracing::instrument(skip(state, req))]
pub async fn create_user(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<UserRequest>, ApiError>,
) -> Result<ApiResponse<User>, ApiError> {
    req.validate()?;

    let new_user = NewUser {
        id: req.id,
        name: req.name.unwrap_or_default(),
        username: req.username.unwrap_or_default(),
        email: req.email.unwrap_or_default(),
        address: req.address,
        phone: req.phone,
        website: req.website,
        company: req.company,
    };

    let user = state
        .users
        .create(&new_user)
        .await
        .map_err(|e| state.internal_error("Failed to create the user", &e))?;

    tracing::info!(user_id = user.id, "User created successfully");
    Ok(ApiResponse::created(user, "User created successfully"))
}

/// Update a user's profile
#[tracing::instrument(skip(state, req))]
pub async fn update_user(
    State(state): State<AppState>,
    WithRejection(Path(raw_id), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Json(req), _): WithRejection<Json<UserRequest>, ApiError>,
) -> Result<ApiResponse<User>, ApiError> {
    req.validate()?;
    let user_id = parse_id(&raw_id, USER_NOT_FOUND)?;

    let changes = UserChanges {
        name: req.name.unwrap_or_default(),
        username: req.username.unwrap_or_default(),
        email: req.email.unwrap_or_default(),
        phone: req.phone,
        website: req.website,
        address: req.address,
        company: req.company,
    };

    match state.users.update(user_id, &changes).await {
        Ok(user) => {
            tracing::info!(user_id, "User updated successfully");
            Ok(ApiResponse::ok(user, "User updated successfully"))
        }
        Err(e) if e.is_not_found() => Err(ApiError::NotFound(USER_NOT_FOUND.to_string())),
        Err(e) => Err(state.internal_error("Failed to update the user", &e)),
    }
}

/// Delete a user. Posts referencing the user are left in place.
#[tracing::instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    WithRejection(Path(raw_id), _): WithRejection<Path<String>, ApiError>,
) -> Result<ApiResponse<()>, ApiError> {
    let user_id = parse_id(&raw_id, USER_NOT_FOUND)?;
    match state.users.delete(user_id).await {
        Ok(()) => {
            tracing::info!(user_id, "User deleted successfully");
            Ok(ApiResponse::message("User deleted successfully"))
        }
        Err(e) if e.is_not_found() => Err(ApiError::NotFound(USER_NOT_FOUND.to_string())),
        Err(e) => Err(state.internal_error("Failed to delete the user", &e)),
    }
}
