//! services/api/src/web/rest.rs
//!
//! Contains the service-level REST handlers (root banner, health check) and the
//! master definition for the OpenAPI specification.

use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::error::{ErrorBody, FieldIssue};
use crate::web::auth::{self, LoginResponse, RegisterResponse};
use crate::web::story::{self, StoriesEnvelope, StoryEnvelope, StoryResponse};
use crate::web::validation::{CreateStoryRequest, LoginRequest, RegisterRequest};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        root_handler,
        health_handler,
        story::create_story_handler,
        story::list_stories_handler,
        story::get_story_handler,
        auth::register_handler,
        auth::login_handler,
    ),
    components(
        schemas(
            CreateStoryRequest, StoryResponse, StoryEnvelope, StoriesEnvelope,
            RegisterRequest, RegisterResponse, LoginRequest, LoginResponse,
            ErrorBody, FieldIssue, HealthResponse, MessageResponse
        )
    ),
    tags(
        (name = "Story Time API", description = "Generate, store and read children's stories.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    pub timestamp: DateTime<Utc>,
    pub status: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Server banner", body = MessageResponse))
)]
pub async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Story Time server running".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        timestamp: Utc::now(),
        status: "Healthy".to_string(),
    })
}
