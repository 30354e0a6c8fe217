//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user registration and login, plus the signed
//! session token they hand out.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use story_time_core::ports::PortError;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ErrorBody, FieldIssue, HttpError};
use crate::web::state::AppState;
use crate::web::validation::{LoginRequest, RegisterRequest};

pub const AUTH_COOKIE: &str = "accessToken";
const TOKEN_TTL_SECS: i64 = 60 * 60;
const INVALID_CREDENTIALS: &str = "Invalid email or password";

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: Uuid,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
}

/// Claims carried by the session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub exp: usize,
}

//=========================================================================================
// Token and Cookie Helpers
//=========================================================================================

pub fn create_token(user_id: Uuid, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let exp = (Utc::now() + Duration::seconds(TOKEN_TTL_SECS)).timestamp().max(0) as usize;
    let claims = Claims { user_id, exp };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
}

/// Returns the user id of a valid, unexpired token.
pub fn verify_token(token: &str, secret: &str) -> Option<Uuid> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims.user_id)
    .ok()
}

pub fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key.trim() == name).then(|| value.trim().to_string())
    })
}

fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        AUTH_COOKIE, token, TOKEN_TTL_SECS
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /user/register - Create a new user account
#[utoipa::path(
    post,
    path = "/user/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = RegisterResponse),
        (status = 400, description = "Invalid request or username/email taken", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[instrument(level = "info", skip_all)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(req) = payload.map_err(body_rejection)?;
    let registration = req.validate().map_err(HttpError::Validation)?;

    // 1. Refuse taken usernames and emails up front
    let existing = state
        .db
        .find_user_by_username_or_email(&registration.username, &registration.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {:?}", e);
            HttpError::internal("Error creating user", e)
        })?;
    if existing.is_some() {
        return Err(HttpError::BadRequest(
            "Username or email already exists".to_string(),
        ));
    }

    // 2. Hash the password
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(registration.password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            HttpError::internal("Error creating user", e)
        })?
        .to_string();

    // 3. Create user in database; the unique constraints catch concurrent duplicates
    let user = state
        .db
        .create_user(&registration.username, &registration.email, &password_hash)
        .await
        .map_err(|e| match e {
            PortError::Conflict(message) => HttpError::BadRequest(message),
            e => {
                error!("Failed to create user: {:?}", e);
                HttpError::internal("Error creating user", e)
            }
        })?;

    info!(user_id = %user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".to_string(),
            user_id: user.id,
        }),
    ))
}

/// POST /user/login - Login with existing account
#[utoipa::path(
    post,
    path = "/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; sets the accessToken cookie", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[instrument(level = "info", skip_all)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(req) = payload.map_err(body_rejection)?;
    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(HttpError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    // 1. Get user by email
    let user_creds = state.db.get_user_by_email(email.trim()).await.map_err(|e| match e {
        PortError::NotFound(_) => HttpError::Unauthorized(INVALID_CREDENTIALS.to_string()),
        e => {
            error!("Failed to get user: {:?}", e);
            HttpError::internal("Error logging in", e)
        }
    })?;

    // 2. Verify password
    let parsed_hash = PasswordHash::new(&user_creds.password_hash).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        HttpError::internal("Error logging in", e)
    })?;
    let valid = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();
    if !valid {
        warn!(user_id = %user_creds.user_id, "Rejected login with wrong password");
        return Err(HttpError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    // 3. Sign the session token
    let secret = state.config.jwt_secret.as_deref().ok_or_else(|| {
        error!("JWT_SECRET is not configured; cannot issue session token");
        HttpError::internal("JWT secret is not configured", "missing JWT_SECRET")
    })?;
    let token = create_token(user_creds.user_id, secret).map_err(|e| {
        error!("Failed to sign session token: {:?}", e);
        HttpError::internal("Error logging in", e)
    })?;

    // 4. Return response with cookie
    let cookie = session_cookie(&token, state.config.secure_cookies);
    info!(user_id = %user_creds.user_id, "User logged in");
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            message: "Login successful".to_string(),
        }),
    ))
}

/// Turns an unreadable JSON body into a 400 validation error.
pub fn body_rejection(rejection: JsonRejection) -> HttpError {
    HttpError::Validation(vec![FieldIssue::new("body", rejection.body_text())])
}
