//! services/api/src/web/validation.rs
//!
//! Request bodies as they arrive on the wire, and the checks that turn them
//! into validated values before anything touches the database.

use crate::error::FieldIssue;
use serde::Deserialize;
use story_time_core::domain::StoryLength;
use utoipa::ToSchema;
use uuid::Uuid;

const MIN_USERNAME_CHARS: usize = 3;
const MIN_PASSWORD_CHARS: usize = 6;

//=========================================================================================
// Story Creation
//=========================================================================================

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoryRequest {
    /// The lesson (moral) the story should teach.
    pub lesson: Option<String>,
    /// Free-form theme such as `FAIRY TALE`, `SPACE`, `ADVENTURE` or `SPOOKY`.
    pub theme: Option<String>,
    /// One of `QUICK`, `NORMAL`, `LONG`. Defaults to `NORMAL`.
    pub length: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidStoryRequest {
    pub lesson: String,
    pub theme: Option<String>,
    pub length: StoryLength,
    pub user_id: Option<Uuid>,
}

impl CreateStoryRequest {
    pub fn validate(self) -> Result<ValidStoryRequest, Vec<FieldIssue>> {
        let mut issues = Vec::new();

        let lesson = self.lesson.as_deref().map(str::trim).unwrap_or_default();
        if lesson.is_empty() {
            issues.push(FieldIssue::new("lesson", "Lesson is required"));
        }

        let length = match self.length.as_deref() {
            None => StoryLength::default(),
            Some(raw) => raw.parse::<StoryLength>().unwrap_or_else(|e| {
                issues.push(FieldIssue::new("length", e.to_string()));
                StoryLength::default()
            }),
        };

        let user_id = match self.user_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    issues.push(FieldIssue::new("userId", "userId must be a valid id"));
                    None
                }
            },
        };

        if !issues.is_empty() {
            return Err(issues);
        }

        let theme = self
            .theme
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(ValidStoryRequest {
            lesson: lesson.to_string(),
            theme,
            length,
            user_id,
        })
    }
}

//=========================================================================================
// Registration
//=========================================================================================

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<ValidRegistration, Vec<FieldIssue>> {
        let mut issues = Vec::new();

        let username = self.username.unwrap_or_default().trim().to_string();
        if username.chars().count() < MIN_USERNAME_CHARS {
            issues.push(FieldIssue::new(
                "username",
                "Username must be at least 3 characters long",
            ));
        }

        let email = self.email.unwrap_or_default().trim().to_string();
        if !is_reasonable_email(&email) {
            issues.push(FieldIssue::new("email", "Invalid email address"));
        }

        let password = self.password.unwrap_or_default();
        if password.chars().count() < MIN_PASSWORD_CHARS {
            issues.push(FieldIssue::new(
                "password",
                "Password must be at least 6 characters long",
            ));
        }

        if issues.is_empty() {
            Ok(ValidRegistration {
                username,
                email,
                password,
            })
        } else {
            Err(issues)
        }
    }
}

fn is_reasonable_email(email: &str) -> bool {
    if email.len() < 5 || email.len() > 254 || email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    parts.next().is_none()
        && !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

//=========================================================================================
// Login
//=========================================================================================

/// Missing fields are treated as wrong credentials rather than validation errors.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}
