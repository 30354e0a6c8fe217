//! services/api/src/web/story.rs
//!
//! Handlers for creating and reading stories.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use story_time_core::domain::{NewStory, Story, StoryLength};
use story_time_core::ports::PortError;
use tracing::{error, info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{ErrorBody, HttpError};
use crate::web::auth::body_rejection;
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;
use crate::web::validation::CreateStoryRequest;

//=========================================================================================
// API Response and Query Structs
//=========================================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoryResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub lesson: String,
    pub theme: Option<String>,
    /// `QUICK`, `NORMAL` or `LONG`.
    #[schema(value_type = String)]
    pub length: StoryLength,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Story> for StoryResponse {
    fn from(story: Story) -> Self {
        Self {
            id: story.id,
            title: story.title,
            content: story.content,
            lesson: story.lesson,
            theme: story.theme,
            length: story.length,
            user_id: story.user_id,
            created_at: story.created_at,
            updated_at: story.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct StoryEnvelope {
    pub message: String,
    pub story: StoryResponse,
}

#[derive(Serialize, ToSchema)]
pub struct StoriesEnvelope {
    pub message: String,
    pub stories: Vec<StoryResponse>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListStoriesQuery {
    /// Only return stories owned by this user.
    pub user_id: Option<String>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Generate a story for a lesson and store it.
///
/// Without a `userId` in the body, the story belongs to the logged-in user (if any).
#[utoipa::path(
    post,
    path = "/story/create",
    request_body = CreateStoryRequest,
    responses(
        (status = 201, description = "Story created successfully", body = StoryEnvelope),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 500, description = "Generation or persistence failed", body = ErrorBody)
    )
)]
#[instrument(level = "info", skip_all)]
pub async fn create_story_handler(
    State(state): State<Arc<AppState>>,
    auth: Option<Extension<AuthUser>>,
    payload: Result<Json<CreateStoryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(req) = payload.map_err(body_rejection)?;
    let valid = req.validate().map_err(HttpError::Validation)?;

    let generated = state
        .story_generator
        .generate_story(&valid.lesson, valid.theme.as_deref(), valid.length)
        .await;

    let new_story = NewStory {
        title: generated.title,
        content: generated.content,
        lesson: valid.lesson,
        theme: valid.theme,
        length: valid.length,
        user_id: valid.user_id.or(auth.map(|Extension(AuthUser(id))| id)),
    };

    let story = state.db.create_story(new_story).await.map_err(|e| {
        error!("Failed to save story: {:?}", e);
        HttpError::internal("Error creating story", e)
    })?;

    info!(story_id = %story.id, length = %story.length, "Story created");
    Ok((
        StatusCode::CREATED,
        Json(StoryEnvelope {
            message: "Story created successfully".to_string(),
            story: story.into(),
        }),
    ))
}

/// List stories, newest first.
#[utoipa::path(
    get,
    path = "/story",
    params(ListStoriesQuery),
    responses(
        (status = 200, description = "Stories retrieved successfully", body = StoriesEnvelope),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[instrument(level = "info", skip(state))]
pub async fn list_stories_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListStoriesQuery>,
) -> Result<Json<StoriesEnvelope>, HttpError> {
    let user_id = match query.user_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            Uuid::parse_str(raw).map_err(|e| HttpError::internal("Error retrieving stories", e))?,
        ),
    };

    let stories = state.db.list_stories(user_id).await.map_err(|e| {
        error!("Failed to list stories: {:?}", e);
        HttpError::internal("Error retrieving stories", e)
    })?;

    Ok(Json(StoriesEnvelope {
        message: "Stories retrieved successfully".to_string(),
        stories: stories.into_iter().map(StoryResponse::from).collect(),
    }))
}

/// Fetch one story.
#[utoipa::path(
    get,
    path = "/story/{id}",
    params(("id" = String, Path, description = "The story id.")),
    responses(
        (status = 200, description = "Story retrieved successfully", body = StoryEnvelope),
        (status = 404, description = "Story not found", body = ErrorBody),
        (status = 500, description = "Malformed id or internal error", body = ErrorBody)
    )
)]
#[instrument(level = "info", skip(state))]
pub async fn get_story_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StoryEnvelope>, HttpError> {
    let story_id =
        Uuid::parse_str(&id).map_err(|e| HttpError::internal("Error retrieving story", e))?;

    let story = state
        .db
        .get_story_by_id(story_id)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => HttpError::NotFound("Story not found".to_string()),
            e => {
                error!("Failed to get story: {:?}", e);
                HttpError::internal("Error retrieving story", e)
            }
        })?;

    Ok(Json(StoryEnvelope {
        message: "Story retrieved successfully".to_string(),
        story: story.into(),
    }))
}
