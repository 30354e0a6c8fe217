//! crates/story_time_core/src/client.rs
//!
//! Client-side mapping between the story-creation UI vocabulary and the
//! backend API, plus the page cursor used by the reading view.

use serde::{Deserialize, Serialize};

use crate::domain::StoryLength;
use crate::paragraphs::split_paragraphs;

/// Minimum number of characters (exclusive) a moral must have.
const MIN_MORAL_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryTheme {
    Fantasy,
    Space,
    Adventure,
    Spooky,
}

impl StoryTheme {
    /// The theme name the backend prompt understands.
    pub fn backend_label(self) -> &'static str {
        match self {
            StoryTheme::Fantasy => "FAIRY TALE",
            StoryTheme::Space => "SPACE",
            StoryTheme::Adventure => "ADVENTURE",
            StoryTheme::Spooky => "SPOOKY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryDuration {
    Short,
    #[default]
    Medium,
    Long,
}

impl From<StoryDuration> for StoryLength {
    fn from(duration: StoryDuration) -> Self {
        match duration {
            StoryDuration::Short => StoryLength::Quick,
            StoryDuration::Medium => StoryLength::Normal,
            StoryDuration::Long => StoryLength::Long,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamsError {
    #[error("The moral must be longer than 2 characters")]
    MoralTooShort,
}

/// What the user picked on the create screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryParams {
    pub theme: StoryTheme,
    pub duration: StoryDuration,
    pub moral: String,
}

/// Body of `POST /story/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoryPayload {
    pub lesson: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<StoryLength>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl StoryParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.moral.chars().count() > MIN_MORAL_CHARS {
            Ok(())
        } else {
            Err(ParamsError::MoralTooShort)
        }
    }

    /// Maps the UI selection onto the backend request vocabulary.
    pub fn to_create_payload(&self, user_id: Option<String>) -> Result<CreateStoryPayload, ParamsError> {
        self.validate()?;
        Ok(CreateStoryPayload {
            lesson: self.moral.trim().to_string(),
            theme: Some(self.theme.backend_label().to_string()),
            length: Some(self.duration.into()),
            user_id,
        })
    }
}

/// A story as the reading view consumes it: one paragraph per page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryData {
    pub title: String,
    pub content: Vec<String>,
}

impl StoryData {
    pub fn from_story(title: &str, content: &str) -> Self {
        Self {
            title: title.to_string(),
            content: split_paragraphs(content),
        }
    }
}

/// Page cursor over a `StoryData`. Navigation clamps at both ends.
#[derive(Debug, Clone)]
pub struct StoryReader {
    story: StoryData,
    page: usize,
}

impl StoryReader {
    pub fn new(story: StoryData) -> Self {
        Self { story, page: 0 }
    }

    pub fn title(&self) -> &str {
        &self.story.title
    }

    /// Zero-based index of the current page.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.story.content.len()
    }

    pub fn current(&self) -> Option<&str> {
        self.story.content.get(self.page).map(String::as_str)
    }

    pub fn is_first_page(&self) -> bool {
        self.page == 0
    }

    pub fn is_last_page(&self) -> bool {
        self.page + 1 >= self.page_count()
    }

    pub fn next_page(&mut self) -> Option<&str> {
        if !self.is_last_page() {
            self.page += 1;
        }
        self.current()
    }

    pub fn previous_page(&mut self) -> Option<&str> {
        self.page = self.page.saturating_sub(1);
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(moral: &str) -> StoryParams {
        StoryParams {
            theme: StoryTheme::Fantasy,
            duration: StoryDuration::Short,
            moral: moral.to_string(),
        }
    }

    #[test]
    fn maps_ui_vocabulary_to_backend() {
        let payload = params("  sharing ").to_create_payload(None).unwrap();
        assert_eq!(payload.lesson, "sharing");
        assert_eq!(payload.theme.as_deref(), Some("FAIRY TALE"));
        assert_eq!(payload.length, Some(StoryLength::Quick));

        assert_eq!(StoryTheme::Space.backend_label(), "SPACE");
        assert_eq!(StoryTheme::Adventure.backend_label(), "ADVENTURE");
        assert_eq!(StoryTheme::Spooky.backend_label(), "SPOOKY");
        assert_eq!(StoryLength::from(StoryDuration::Medium), StoryLength::Normal);
        assert_eq!(StoryLength::from(StoryDuration::Long), StoryLength::Long);
    }

    #[test]
    fn rejects_short_moral() {
        assert_eq!(params("ab").validate(), Err(ParamsError::MoralTooShort));
        assert!(params("abc").validate().is_ok());
        assert!(params("").to_create_payload(None).is_err());
    }

    #[test]
    fn payload_serializes_with_backend_field_names() {
        let payload = params("honesty")
            .to_create_payload(Some("abc".to_string()))
            .unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "lesson": "honesty",
                "theme": "FAIRY TALE",
                "length": "QUICK",
                "userId": "abc"
            })
        );
    }

    #[test]
    fn reader_pages_through_paragraphs() {
        let data = StoryData::from_story("T", "One.\n\nTwo.\n\nThree.");
        let mut reader = StoryReader::new(data);
        assert_eq!(reader.page_count(), 3);
        assert!(reader.is_first_page());
        assert_eq!(reader.previous_page(), Some("One."));
        assert_eq!(reader.next_page(), Some("Two."));
        assert_eq!(reader.next_page(), Some("Three."));
        assert!(reader.is_last_page());
        assert_eq!(reader.next_page(), Some("Three."));
        assert_eq!(reader.page(), 2);
    }
}
