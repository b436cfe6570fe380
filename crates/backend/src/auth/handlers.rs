//! Authentication HTTP handlers.

use axum::{extract::State, http::StatusCode, Extension, Json};
use shared_types::{LoginRequest, LoginResponse, RegisterRequest, UserProfile};
use validator::Validate;

use crate::db::{get_conn, users};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::models::NewUser;
use crate::AppState;

use super::{jwt, password, types::AuthUser};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Register a new account.
///
/// Usernames and emails are unique; the pre-checks give a precise message
/// and the table constraints catch the race between check and insert.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let payload = RegisterRequest {
        username: payload.username.trim().to_string(),
        email: payload.email.trim().to_lowercase(),
        password: payload.password,
    };
    payload.validate()?;

    let mut conn = get_conn(&state.pool).await?;

    if users::username_exists(&mut conn, &payload.username).await? {
        return Err(ApiError::conflict("Username already exists"));
    }
    if users::email_exists(&mut conn, &payload.email).await? {
        return Err(ApiError::conflict("Email is already registered"));
    }

    let plain = payload.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| anyhow::anyhow!("Password hashing task failed: {}", e))??;

    let user = users::create(
        &mut conn,
        NewUser {
            username: &payload.username,
            email: &payload.email,
            password_hash: &password_hash,
        },
    )
    .await?;

    tracing::info!("Registered user {} ({})", user.username, user.id);

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchange a username and password for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    payload.validate()?;

    let mut conn = get_conn(&state.pool).await?;

    let user = users::get_by_username(&mut conn, payload.username.trim())
        .await?
        .ok_or_else(|| {
            tracing::info!("Login attempt for unknown user");
            ApiError::unauthorized(INVALID_CREDENTIALS)
        })?;

    let stored_hash = user.password_hash.clone();
    let verified =
        tokio::task::spawn_blocking(move || password::verify_password(&payload.password, &stored_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Password verification task failed: {}", e))?;

    if !verified {
        tracing::info!("Failed login for {}", user.username);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = jwt::create_token(&state.auth_config, user.id, &user.username)
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    tracing::info!("Successful login for {}", user.username);

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// Get the current authenticated user's profile.
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<UserProfile>> {
    let mut conn = get_conn(&state.pool).await?;

    let user = users::get_by_id(&mut conn, auth.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(user.into()))
}
