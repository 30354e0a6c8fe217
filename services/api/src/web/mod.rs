pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod story;
pub mod validation;

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::ConfigError;
use auth::{login_handler, register_handler};
use middleware::optional_auth;
use rest::{health_handler, root_handler, ApiDoc};
use state::AppState;
use story::{create_story_handler, get_story_handler, list_stories_handler};

/// Builds the complete application router: API routes, CORS for the web
/// client, request tracing and the Swagger UI.
pub fn build_router(state: Arc<AppState>) -> Result<Router, ConfigError> {
    let client_origin = state
        .config
        .client_url
        .parse::<HeaderValue>()
        .map_err(|e| ConfigError::InvalidValue("CLIENT_URL".to_string(), e.to_string()))?;

    let cors = CorsLayer::new()
        .allow_origin(client_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // Story routes are public; a session cookie only supplies a default owner.
    let story_routes = Router::new()
        .route("/story/create", post(create_story_handler))
        .route("/story", get(list_stories_handler))
        .route("/story/{id}", get(get_story_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            optional_auth,
        ));

    let user_routes = Router::new()
        .route("/user/register", post(register_handler))
        .route("/user/login", post(login_handler));

    let api_router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(story_routes)
        .merge(user_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Merge the API router with the Swagger UI router for a complete application.
    Ok(Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())))
}
