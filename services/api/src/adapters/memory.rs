//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the `DatabaseService` port. Used by the test
//! suite and when the server runs with `CONNECTION_STRING=memory://`.

use async_trait::async_trait;
use chrono::Utc;
use story_time_core::domain::{NewStory, Story, User, UserCredentials};
use story_time_core::ports::{DatabaseService, PortError, PortResult};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<(User, String)>,
    stories: Vec<Story>,
}

/// Keeps users and stories in memory. Insertion order stands in for time when
/// two records share a timestamp.
#[derive(Default)]
pub struct MemoryAdapter {
    tables: RwLock<Tables>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users. Diagnostic helper for tests that check
    /// registration never writes a duplicate record.
    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }
}

#[async_trait]
impl DatabaseService for MemoryAdapter {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> PortResult<User> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|(u, _)| u.username == username || u.email == email)
        {
            return Err(PortError::Conflict(
                "Username or email already exists".to_string(),
            ));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        tables.users.push((user.clone(), password_hash.to_string()));
        Ok(user)
    }

    async fn find_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> PortResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|(u, _)| u.username == username || u.email == email)
            .map(|(u, _)| u.clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|(u, _)| u.email == email)
            .map(|(u, hash)| UserCredentials {
                user_id: u.id,
                email: u.email.clone(),
                password_hash: hash.clone(),
            })
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }

    async fn create_story(&self, story: NewStory) -> PortResult<Story> {
        let now = Utc::now();
        let stored = Story {
            id: Uuid::new_v4(),
            title: story.title,
            content: story.content,
            lesson: story.lesson,
            theme: story.theme,
            length: story.length,
            user_id: story.user_id,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.stories.push(stored.clone());
        Ok(stored)
    }

    async fn list_stories(&self, user_id: Option<Uuid>) -> PortResult<Vec<Story>> {
        let tables = self.tables.read().await;
        let mut stories: Vec<Story> = tables
            .stories
            .iter()
            .rev()
            .filter(|s| user_id.is_none() || s.user_id == user_id)
            .cloned()
            .collect();
        // Stable sort keeps reverse insertion order for equal timestamps.
        stories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(stories)
    }

    async fn get_story_by_id(&self, story_id: Uuid) -> PortResult<Story> {
        let tables = self.tables.read().await;
        tables
            .stories
            .iter()
            .find(|s| s.id == story_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Story {} not found", story_id)))
    }
}
