pub mod client;
pub mod domain;
pub mod fallback;
pub mod paragraphs;
pub mod ports;

pub use domain::{GeneratedStory, NewStory, Story, StoryLength, User, UserCredentials};
pub use fallback::{generate_fallback_story, TemplateStoryGenerator};
pub use paragraphs::split_paragraphs;
pub use ports::{DatabaseService, PortError, PortResult, StoryGenerationService};
