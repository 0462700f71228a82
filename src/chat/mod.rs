//! Chat collaborator: streaming model client and local transcript store.

pub mod gemini;
pub mod history;
pub mod message;

pub use gemini::GeminiClient;
pub use history::{Conversation, ConversationStore};
pub use message::{ChatMessage, ChatRole};
