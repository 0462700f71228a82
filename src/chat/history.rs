use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::{Result, ZyraError};

use super::message::{ChatMessage, ChatRole};

const TITLE_MAX_CHARS: usize = 50;

/// A persisted conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Key-value conversation store, one JSON file per conversation id.
///
/// # Example
/// ```no_run
/// use zyra::chat::ConversationStore;
///
/// let store = ConversationStore::new("/tmp/conversations".into());
/// let mut conversation = store.get_or_create(None)?;
/// store.append_user_message(&mut conversation, "hello")?;
/// # Ok::<(), zyra::error::ZyraError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConversationStore {
    base_dir: PathBuf,
}

impl ConversationStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    fn conversation_path(&self, id: &Uuid) -> PathBuf {
        self.base_dir.join(format!("{id}.json"))
    }

    /// Load the conversation with `id`, or start a fresh one when `id` is
    /// `None` or the file is gone.
    pub fn get_or_create(&self, id: Option<Uuid>) -> Result<Conversation> {
        if let Some(id) = id {
            match self.load(&id) {
                Some(conversation) => return Ok(conversation),
                None => warn!(%id, "conversation not found, starting a new one"),
            }
        }
        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::new_v4(),
            title: "New conversation".to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.persist(&conversation)?;
        Ok(conversation)
    }

    pub fn load(&self, id: &Uuid) -> Option<Conversation> {
        let raw = fs::read_to_string(self.conversation_path(id)).ok()?;
        match serde_json::from_str(&raw) {
            Ok(conversation) => Some(conversation),
            Err(err) => {
                warn!(%id, error = %err, "conversation file malformed");
                None
            }
        }
    }

    /// Append a user message, titling the conversation from its first
    /// user message (truncated to 50 characters).
    pub fn append_user_message(
        &self,
        conversation: &mut Conversation,
        content: impl Into<String>,
    ) -> Result<()> {
        let content = content.into();
        let first = !conversation
            .messages
            .iter()
            .any(|m| m.role == ChatRole::User);
        if first {
            conversation.title = derive_title(&content);
        }
        conversation.messages.push(ChatMessage::user(content));
        self.touch_and_persist(conversation)
    }

    pub fn append_assistant_message(
        &self,
        conversation: &mut Conversation,
        content: impl Into<String>,
    ) -> Result<()> {
        conversation.messages.push(ChatMessage::assistant(content));
        self.touch_and_persist(conversation)
    }

    fn touch_and_persist(&self, conversation: &mut Conversation) -> Result<()> {
        conversation.updated_at = Utc::now();
        self.persist(conversation)
    }

    fn persist(&self, conversation: &Conversation) -> Result<()> {
        fs::create_dir_all(&self.base_dir)?;
        let serialized = serde_json::to_string_pretty(conversation)?;
        fs::write(self.conversation_path(&conversation.id), serialized)
            .map_err(ZyraError::from)
    }
}

fn derive_title(first_message: &str) -> String {
    let mut title: String = first_message.chars().take(TITLE_MAX_CHARS).collect();
    if first_message.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}
