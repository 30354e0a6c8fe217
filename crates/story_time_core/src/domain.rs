//! crates/story_time_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or HTTP framework.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How long a generated story should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StoryLength {
    Quick,
    #[default]
    Normal,
    Long,
}

impl StoryLength {
    pub const ALL: [StoryLength; 3] = [StoryLength::Quick, StoryLength::Normal, StoryLength::Long];

    /// Approximate number of words a story of this length should contain.
    pub fn target_word_count(self) -> usize {
        match self {
            StoryLength::Quick => 300,
            StoryLength::Normal => 500,
            StoryLength::Long => 1000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StoryLength::Quick => "QUICK",
            StoryLength::Normal => "NORMAL",
            StoryLength::Long => "LONG",
        }
    }
}

impl fmt::Display for StoryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid story length '{0}', expected one of QUICK, NORMAL, LONG")]
pub struct ParseStoryLengthError(pub String);

impl FromStr for StoryLength {
    type Err = ParseStoryLengthError;

    /// Parses the exact upper-case wire form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "QUICK" => Ok(StoryLength::Quick),
            "NORMAL" => Ok(StoryLength::Normal),
            "LONG" => Ok(StoryLength::Long),
            other => Err(ParseStoryLengthError(other.to_string())),
        }
    }
}

/// A persisted story. Created once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub lesson: String,
    pub theme: Option<String>,
    pub length: StoryLength,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The validated fields needed to persist a new story.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStory {
    pub title: String,
    pub content: String,
    pub lesson: String,
    pub theme: Option<String>,
    pub length: StoryLength,
    pub user_id: Option<Uuid>,
}

/// The output of any story generator: a title and free-text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedStory {
    pub title: String,
    pub content: String,
}

// Represents a user - used throughout app
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub password_hash: String,
}
