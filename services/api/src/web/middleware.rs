//! services/api/src/web/middleware.rs
//!
//! Session middleware for the story routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::web::auth::{get_cookie_value, verify_token, AUTH_COOKIE};
use crate::web::state::AppState;

/// The user identified by a valid session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

/// Middleware that recognises the session cookie without requiring it.
///
/// If the `accessToken` cookie holds a valid token, an `AuthUser` is inserted
/// into the request extensions. A missing or invalid token lets the request
/// through anonymously.
pub async fn optional_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let user_id = state.config.jwt_secret.as_deref().and_then(|secret| {
        let token = get_cookie_value(req.headers(), AUTH_COOKIE)?;
        let user_id = verify_token(&token, secret);
        if user_id.is_none() {
            debug!("Ignoring invalid or expired session token");
        }
        user_id
    });

    if let Some(user_id) = user_id {
        req.extensions_mut().insert(AuthUser(user_id));
    }

    next.run(req).await
}
