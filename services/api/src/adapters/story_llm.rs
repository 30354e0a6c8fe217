//! services/api/src/adapters/story_llm.rs
//!
//! This module contains the adapter for the story-writing LLM. It talks to Gemini
//! through its OpenAI-compatible endpoint and implements the
//! `StoryGenerationService` port from the `core` crate.
//!
//! Generation never fails: without an API key, or when the call goes wrong in
//! any way, the adapter answers with the local template story instead.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;
use story_time_core::{
    domain::{GeneratedStory, StoryLength},
    fallback::generate_fallback_story,
    ports::StoryGenerationService,
};
use tracing::{info, instrument, warn};

const SYSTEM_INSTRUCTIONS: &str =
    "You are a creative children's story writer. Create an engaging, age-appropriate story that is educational and fun.";

const UNTITLED: &str = "Untitled Story";

#[derive(Debug, thiserror::Error)]
enum StoryCallError {
    #[error("request failed: {0}")]
    Api(#[from] OpenAIError),
    #[error("response contained no text")]
    Empty,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `StoryGenerationService` using Gemini.
#[derive(Clone)]
pub struct GeminiStoryAdapter {
    /// `None` when no API key is configured: every request uses the templates.
    client: Option<Client<OpenAIConfig>>,
    model: String,
}

impl GeminiStoryAdapter {
    /// Creates a new `GeminiStoryAdapter`. Pass `None` as the key to run in
    /// template-only mode.
    ///
    /// The client makes exactly one attempt per story: a rate limit or an
    /// overloaded backend goes straight to the template fallback.
    pub fn new(api_key: Option<&str>, api_base: &str, model: String) -> Self {
        let client = api_key.map(|key| {
            Client::with_config(
                OpenAIConfig::new()
                    .with_api_key(key)
                    .with_api_base(api_base),
            )
            .with_backoff(single_attempt())
        });
        Self { client, model }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    async fn request_story(
        &self,
        client: &Client<OpenAIConfig>,
        prompt: String,
    ) -> Result<String, StoryCallError> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()?;

        let response = client.chat().create(request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(StoryCallError::Empty)
    }
}

/// A backoff policy whose retry budget is already spent after the first call.
fn single_attempt() -> backoff::ExponentialBackoff {
    backoff::ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

//=========================================================================================
// `StoryGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl StoryGenerationService for GeminiStoryAdapter {
    #[instrument(level = "info", skip(self), fields(model = %self.model))]
    async fn generate_story(
        &self,
        lesson: &str,
        theme: Option<&str>,
        length: StoryLength,
    ) -> GeneratedStory {
        let Some(client) = &self.client else {
            info!("No Gemini API key configured; using template story");
            return generate_fallback_story(lesson, theme, length);
        };

        let prompt = build_prompt(lesson, theme, length);
        match self.request_story(client, prompt).await {
            Ok(text) => {
                info!(response_len = text.len(), "Gemini story received");
                parse_story_response(&text)
            }
            Err(e) => {
                warn!("Gemini story generation failed, falling back to template: {}", e);
                generate_fallback_story(lesson, theme, length)
            }
        }
    }
}

//=========================================================================================
// Prompt and Response Handling
//=========================================================================================

/// Builds the user prompt describing the story to write.
pub fn build_prompt(lesson: &str, theme: Option<&str>, length: StoryLength) -> String {
    let word_count = length.target_word_count();
    let mut prompt = format!("THE MAIN LESSON: The hero should learn about \"{lesson}\"\n\n");
    if let Some(theme) = theme {
        prompt.push_str(&format!("THEME: {theme}\n"));
    }
    prompt.push_str(&format!(
        "STORY LENGTH: Approximately {word_count} words\n\n\
         Please create a complete children's story with:\n\
         1. A creative and engaging title (on the first line, followed by a blank line)\n\
         2. A complete story that teaches the lesson \"{lesson}\" in an engaging way\n\
         3. The story should be appropriate for children ages 5-10\n\
         4. Include vivid descriptions and a clear narrative arc\n\
         5. Make it fun, imaginative, and memorable\n\n\
         Format your response as:\n\
         TITLE: [Story Title]\n\n\
         [Story content here]"
    ));
    prompt
}

/// The `TITLE:` marker line. Whitespace after the marker may span lines, so a
/// title written on the line below the marker is still picked up.
fn title_line() -> Option<&'static Regex> {
    static TITLE_LINE: OnceLock<Option<Regex>> = OnceLock::new();
    TITLE_LINE
        .get_or_init(|| Regex::new(r"(?i)\ATITLE:\s*([^\n]+?)[ \t]*(?:\r?\n|\z)").ok())
        .as_ref()
}

/// Splits raw model output into a title and content.
///
/// A leading `TITLE:` line supplies the title; otherwise the first non-empty
/// line does. When nothing is left for the content, the raw text is used.
pub fn parse_story_response(raw: &str) -> GeneratedStory {
    let text = raw.trim_start();

    let (title, rest) = match title_line().and_then(|re| re.captures(text)) {
        Some(caps) => {
            let title = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
            let consumed = caps.get(0).map_or(0, |m| m.end());
            (title, &text[consumed..])
        }
        None => match text.split_once('\n') {
            Some((first, rest)) => (first.trim().to_string(), rest),
            None => (text.trim().to_string(), ""),
        },
    };

    let title = if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    };
    let content = match rest.trim() {
        "" => raw.to_string(),
        content => content.to_string(),
    };

    GeneratedStory { title, content }
}
