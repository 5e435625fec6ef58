use axum::extract::{FromRef, State};
use axum::http::{header, HeaderMap};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{info, instrument, warn};

use crate::auth::dto::{
    BalanceResponse, CurrentUserResponse, LoginRequest, MessageResponse, RegisterRequest,
};
use crate::auth::extract::{auth_cookie, AuthClaims};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::{SessionToken, User};
use crate::auth::token::TokenKeys;
use crate::error::{is_unique_violation, ApiError, ApiResult};
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/balance", get(balance))
        .route("/user", get(current_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Json<MessageResponse>> {
    if payload.username.is_empty()
        || payload.email.is_empty()
        || payload.password.is_empty()
        || payload.phone.is_empty()
    {
        warn!("registration with missing fields");
        return Err(ApiError::Validation("All fields are required"));
    }

    if User::find_by_username(&state.db, &payload.username)
        .await
        .map_err(|e| ApiError::internal("Registration failed", e))?
        .is_some()
    {
        warn!(username = %payload.username, "username already registered");
        return Err(ApiError::DuplicateUsername);
    }

    let password_hash = hash_password(&payload.password)
        .map_err(|e| ApiError::internal("Registration failed", e))?;

    let user = match User::create(
        &state.db,
        &payload.username,
        &payload.email,
        &password_hash,
        &payload.phone,
    )
    .await
    {
        Ok(user) => user,
        // Lost a race against a concurrent registration for the same name.
        Err(e) if is_unique_violation(&e) => {
            warn!(username = %payload.username, "username already registered");
            return Err(ApiError::DuplicateUsername);
        }
        Err(e) => return Err(ApiError::internal("Registration failed", e)),
    };

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(Json(MessageResponse {
        success: true,
        message: "Registration successful",
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<(HeaderMap, Json<MessageResponse>)> {
    if payload.username.is_empty() || payload.password.is_empty() {
        warn!("login with missing fields");
        return Err(ApiError::Validation("Username and password are required"));
    }

    let user = User::find_by_username(&state.db, &payload.username)
        .await
        .map_err(|e| ApiError::internal("Login failed", e))?
        .ok_or_else(|| {
            warn!(username = %payload.username, "login with unknown username");
            ApiError::InvalidCredentials
        })?;

    let password_ok = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| ApiError::internal("Login failed", e))?;
    if !password_ok {
        warn!(user_id = user.id, "login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = TokenKeys::from_ref(&state);
    let issued = keys
        .issue(&user.username, user.role)
        .map_err(|e| ApiError::internal("Login failed", e))?;

    SessionToken::record(&state.db, &issued.token, user.id, issued.expires_at_ms)
        .await
        .map_err(|e| ApiError::internal("Login failed", e))?;

    let cookie = auth_cookie(&issued.token, keys.max_age_secs());
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        cookie
            .parse()
            .map_err(|e| ApiError::internal("Login failed", e))?,
    );

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok((
        headers,
        Json(MessageResponse {
            success: true,
            message: "Login successful",
        }),
    ))
}

#[instrument(skip(state))]
pub async fn balance(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> ApiResult<Json<BalanceResponse>> {
    let user = User::find_by_username(&state.db, &claims.sub)
        .await
        .map_err(|e| ApiError::internal("Balance lookup failed", e))?
        .ok_or_else(|| {
            warn!(username = %claims.sub, "token subject no longer exists");
            ApiError::UserNotFound
        })?;

    Ok(Json(BalanceResponse {
        balance: user.balance,
    }))
}

#[instrument]
pub async fn current_user(AuthClaims(claims): AuthClaims) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse {
        username: claims.sub,
    })
}
