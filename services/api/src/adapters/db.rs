//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use story_time_core::domain::{NewStory, Story, StoryLength, User, UserCredentials};
use story_time_core::ports::{DatabaseService, PortError, PortResult};
use tracing::warn;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

const STORY_COLUMNS: &str =
    "id, title, content, lesson, theme, length, user_id, created_at, updated_at";

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    email: String,
    password_hash: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.id,
            email: self.email,
            password_hash: self.password_hash,
        }
    }
}

#[derive(FromRow)]
struct StoryRecord {
    id: Uuid,
    title: String,
    content: String,
    lesson: String,
    theme: Option<String>,
    length: String,
    user_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl StoryRecord {
    fn to_domain(self) -> Story {
        // The column has a CHECK constraint; anything else is a hand-edited row.
        let length = self.length.parse::<StoryLength>().unwrap_or_else(|e| {
            warn!(story_id = %self.id, "{}; treating as NORMAL", e);
            StoryLength::Normal
        });
        Story {
            id: self.id,
            title: self.title,
            content: self.content,
            lesson: self.lesson,
            theme: self.theme,
            length,
            user_id: self.user_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, username, email, password_hash) VALUES ($1, $2, $3, $4) \
             RETURNING id, username, email, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PortError::Conflict("Username or email already exists".to_string())
            }
            other => unexpected(other),
        })?;
        Ok(record.to_domain())
    }

    async fn find_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> PortResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, email, created_at FROM users \
             WHERE username = $1 OR email = $2 LIMIT 1",
        )
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.map(UserRecord::to_domain))
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", email)),
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn create_story(&self, story: NewStory) -> PortResult<Story> {
        let sql = format!(
            "INSERT INTO stories (id, title, content, lesson, theme, length, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {STORY_COLUMNS}"
        );
        let record = sqlx::query_as::<_, StoryRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(story.title)
            .bind(story.content)
            .bind(story.lesson)
            .bind(story.theme)
            .bind(story.length.as_str())
            .bind(story.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_stories(&self, user_id: Option<Uuid>) -> PortResult<Vec<Story>> {
        let records = match user_id {
            Some(user_id) => {
                let sql = format!(
                    "SELECT {STORY_COLUMNS} FROM stories WHERE user_id = $1 ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, StoryRecord>(&sql)
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!("SELECT {STORY_COLUMNS} FROM stories ORDER BY created_at DESC");
                sqlx::query_as::<_, StoryRecord>(&sql)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(unexpected)?;

        Ok(records.into_iter().map(StoryRecord::to_domain).collect())
    }

    async fn get_story_by_id(&self, story_id: Uuid) -> PortResult<Story> {
        let sql = format!("SELECT {STORY_COLUMNS} FROM stories WHERE id = $1");
        let record = sqlx::query_as::<_, StoryRecord>(&sql)
            .bind(story_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    PortError::NotFound(format!("Story {} not found", story_id))
                }
                _ => unexpected(e),
            })?;
        Ok(record.to_domain())
    }
}
