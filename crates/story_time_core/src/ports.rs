//! crates/story_time_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{GeneratedStory, NewStory, Story, StoryLength, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- User Management ---
    /// Stores a new user. Fails with `PortError::Conflict` when the username
    /// or email is already taken.
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> PortResult<User>;

    async fn find_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> PortResult<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    // --- Story Management ---
    async fn create_story(&self, story: NewStory) -> PortResult<Story>;

    /// Lists stories newest first, optionally restricted to one owner.
    async fn list_stories(&self, user_id: Option<Uuid>) -> PortResult<Vec<Story>>;

    async fn get_story_by_id(&self, story_id: Uuid) -> PortResult<Story>;
}

#[async_trait]
pub trait StoryGenerationService: Send + Sync {
    /// Produces a story teaching `lesson`. Implementations must always return
    /// something, degrading to a local generator when their backend fails.
    async fn generate_story(
        &self,
        lesson: &str,
        theme: Option<&str>,
        length: StoryLength,
    ) -> GeneratedStory;
}
