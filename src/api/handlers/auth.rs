use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::auth::password::verify_password;

/// Request body for admin login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response from successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Login with the configured admin credentials
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let admin = state
        .admin
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Admin login is not configured"))?;

    if req.username != admin.username {
        tracing::warn!(username = %req.username, "Login attempt with unknown username");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let valid = verify_password(&req.password, &admin.password_hash).map_err(|e| {
        ApiError::internal_server_error(format!("Password verification failed: {}", e))
    })?;

    if !valid {
        tracing::warn!(username = %req.username, "Login attempt with wrong password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = state
        .jwt
        .create_token(&admin.username)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to create token: {}", e)))?;

    tracing::info!(username = %admin.username, "Admin logged in");
    Ok(Json(LoginResponse {
        token,
        token_type: "bearer",
        expires_in: state.jwt.ttl_seconds(),
    }))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
