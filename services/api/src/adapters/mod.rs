pub mod db;
pub mod memory;
pub mod story_llm;

pub use db::DbAdapter;
pub use memory::MemoryAdapter;
pub use story_llm::GeminiStoryAdapter;
