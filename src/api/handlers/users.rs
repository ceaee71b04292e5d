use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::inventory::InventoryItem;
use crate::domain::repositories::ProfileUpdate;
use crate::domain::user::{Email, PreferencesUpdate, User, UserPreferences};

const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 100;

/// Pagination for the user listing
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Request body for profile edits
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

/// User as exposed to admins
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_id: String,
    pub phone_number: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub preferences: UserPreferences,
    pub inventory_items: usize,
    pub conversation_turns: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.clone(),
            phone_number: user.phone_number.to_string(),
            name: user.name.clone(),
            email: user.email.as_ref().map(|e| e.to_string()),
            preferences: user.preferences.clone(),
            inventory_items: user.kitchen_inventory.ingredients.len(),
            conversation_turns: user.conversation_history.len(),
            created_at: user.created_at,
            updated_at: user.updated_at,
            is_active: user.is_active,
        }
    }
}

/// A user's kitchen stock
#[derive(Debug, Serialize)]
pub struct InventoryResponse {
    pub user_id: String,
    pub ingredients: Vec<InventoryItem>,
    pub last_updated: DateTime<Utc>,
}

async fn load_user(state: &AppState, user_id: &str) -> Result<User, ApiError> {
    state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User not found: {}", user_id)))
}

/// List users, newest first
///
/// GET /api/users?limit=&offset=
pub async fn list_users(
    _auth: JwtAuth,
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    if limit == 0 || limit > MAX_PAGE_SIZE {
        return Err(ApiError::bad_request(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }

    let users = state.users.list(limit, query.offset.unwrap_or(0)).await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// Get a user by ID
///
/// GET /api/users/:user_id
pub async fn get_user(
    _auth: JwtAuth,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = load_user(&state, &user_id).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// Edit name, email or the active flag
///
/// PATCH /api/users/:user_id
pub async fn update_user(
    JwtAuth(admin): JwtAuth,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let email = req
        .email
        .map(Email::new)
        .transpose()
        .map_err(ApiError::bad_request)?;

    let update = ProfileUpdate {
        name: req.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        email,
        is_active: req.is_active,
    };
    if update.name.is_none() && update.email.is_none() && update.is_active.is_none() {
        return Err(ApiError::bad_request("No fields to update"));
    }

    state.users.update_profile(&user_id, &update).await?;
    tracing::info!(user_id = %user_id, admin = %admin, "User profile updated");

    let user = load_user(&state, &user_id).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// Delete a user
///
/// DELETE /api/users/:user_id
pub async fn delete_user(
    JwtAuth(admin): JwtAuth,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.users.delete(&user_id).await?;
    tracing::info!(user_id = %user_id, admin = %admin, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Merge a partial preference update
///
/// PATCH /api/users/:user_id/preferences
pub async fn update_preferences(
    _auth: JwtAuth,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<UserPreferences>, ApiError> {
    if update.is_empty() {
        return Err(ApiError::bad_request("No preferences to update"));
    }

    let mut preferences = load_user(&state, &user_id).await?.preferences;
    preferences.apply(update);
    state.users.update_preferences(&user_id, &preferences).await?;

    Ok(Json(preferences))
}

/// Get a user's kitchen inventory
///
/// GET /api/users/:user_id/inventory
pub async fn get_inventory(
    _auth: JwtAuth,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<InventoryResponse>, ApiError> {
    let user = load_user(&state, &user_id).await?;
    Ok(Json(InventoryResponse {
        user_id: user.user_id,
        ingredients: user.kitchen_inventory.ingredients,
        last_updated: user.kitchen_inventory.last_updated,
    }))
}

/// Wipe a user's conversation history
///
/// DELETE /api/users/:user_id/conversation
pub async fn clear_conversation(
    _auth: JwtAuth,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .users
        .save_conversation(&user_id, &[], Utc::now())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
