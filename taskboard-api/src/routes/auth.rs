/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /register` - Create an account, returns the user and a token
/// - `POST /login` - Verify credentials, returns the user and a token
///
/// Both respond with the same `{user, token}` shape; the issued token has
/// no expiry (see `taskboard_shared::auth::jwt`).

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Register / login request body
///
/// Missing fields deserialize to empty strings and fail validation, so a
/// body without a username or password is a 400 rather than a framework
/// rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    /// Username (unique across all users)
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Plaintext password; hashed before it leaves the handler
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register / login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// The account (password hash omitted)
    pub user: User,

    /// Signed bearer token for subsequent requests
    pub token: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /register
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "secret123"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing fields or duplicate username
/// - `500 Internal Server Error`: server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    // Hash before touching the store; the plaintext is never persisted
    // or logged.
    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            password_hash,
        },
    )
    .await?;

    let token = jwt::create_token(&jwt::Claims::new(user.id), state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// Login with existing credentials
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "secret123"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing fields or invalid credentials; an unknown
///   username and a wrong password produce the identical error body
/// - `500 Internal Server Error`: server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    let token = jwt::create_token(&jwt::Claims::new(user.id), state.jwt_secret())?;

    Ok(Json(AuthResponse { user, token }))
}
