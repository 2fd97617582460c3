//! Chat transcripts with the buddy character and their summary entries.

use crate::constants::{CONVERSATION_TAGS, EMPTY_CONVERSATION_CONTENT};
use crate::diary::{DiaryEntry, IdGenerator, Message, Role, UserSettings};
use crate::errors::{AppError, AppResult};
use crate::store::RecordStore;
use chrono::{DateTime, Local, SecondsFormat, Utc};
use tracing::info;

/// An ordered chat transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// A conversation opened by the buddy greeting the user.
    pub fn with_greeting(ids: &IdGenerator, at: DateTime<Utc>) -> Self {
        let mut conversation = Self::new();
        conversation.push(ids, Role::Buddy, "Hi! How was your day? Tell me anything.", at);
        conversation
    }

    /// Appends a message with a freshly generated id.
    pub fn push(
        &mut self,
        ids: &IdGenerator,
        role: Role,
        content: impl Into<String>,
        at: DateTime<Utc>,
    ) -> &Message {
        let index = self.messages.len();
        self.messages.push(Message {
            id: ids.next_id(),
            role,
            content: content.into(),
            timestamp: at,
        });
        &self.messages[index]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages written by the user, in order.
    pub fn user_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.role == Role::User)
    }
}

/// Turns a finished conversation into a diary entry.
///
/// The content is the user's messages joined by single spaces, and the full
/// transcript is attached to the entry. The title and last tag name the buddy
/// character from `settings`.
///
/// # Errors
///
/// Returns `AppError::ConversationTooShort` if the user never wrote anything.
///
/// # Examples
///
/// ```
/// use buddy_diary::diary::{IdGenerator, Role, UserSettings};
/// use buddy_diary::ops::conversation::{summarize_conversation, Conversation};
/// use chrono::{Local, Utc};
///
/// let ids = IdGenerator::new();
/// let mut chat = Conversation::with_greeting(&ids, Utc::now());
/// chat.push(&ids, Role::User, "Baked bread.", Utc::now());
/// chat.push(&ids, Role::User, "It burned.", Utc::now());
///
/// let entry = summarize_conversation(&chat, &UserSettings::default(), &ids, Local::now()).unwrap();
/// assert_eq!(entry.content, "Baked bread. It burned.");
/// assert_eq!(entry.tags, vec!["daily", "conversation", "Buddy"]);
/// assert_eq!(entry.messages.unwrap().len(), 3);
/// ```
pub fn summarize_conversation(
    conversation: &Conversation,
    settings: &UserSettings,
    ids: &IdGenerator,
    now: DateTime<Local>,
) -> AppResult<DiaryEntry> {
    let user_lines: Vec<&str> = conversation
        .user_messages()
        .map(|m| m.content.as_str())
        .collect();
    if user_lines.is_empty() {
        return Err(AppError::ConversationTooShort);
    }

    let joined = user_lines.join(" ");
    let content = if joined.trim().is_empty() {
        EMPTY_CONVERSATION_CONTENT.to_string()
    } else {
        joined
    };

    let character = settings.character_name.clone();
    let mut tags: Vec<String> = CONVERSATION_TAGS.iter().map(|t| t.to_string()).collect();
    tags.push(character.clone());

    Ok(DiaryEntry {
        id: ids.next_id(),
        title: format!("A special day with {}", character),
        content,
        tags,
        date: now.to_rfc3339_opts(SecondsFormat::Millis, false),
        emotion: None,
        images: Vec::new(),
        messages: Some(conversation.messages().to_vec()),
    })
}

/// Summarizes `conversation` and stores the result as the newest entry.
pub fn save_conversation(
    store: &RecordStore,
    conversation: &Conversation,
    ids: &IdGenerator,
    now: DateTime<Local>,
) -> AppResult<DiaryEntry> {
    let settings = store.get_settings();
    let entry = summarize_conversation(conversation, &settings, ids, now)?;
    store.try_create_entry(&entry)?;
    info!(
        "Saved conversation of {} messages as entry {}",
        conversation.messages().len(),
        entry.id
    );
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_only_is_too_short() {
        let ids = IdGenerator::new();
        let chat = Conversation::with_greeting(&ids, Utc::now());

        assert!(matches!(
            summarize_conversation(&chat, &UserSettings::default(), &ids, Local::now()),
            Err(AppError::ConversationTooShort)
        ));
    }

    #[test]
    fn test_message_ids_are_unique_and_ordered() {
        let ids = IdGenerator::new();
        let mut chat = Conversation::new();
        let first = chat.push(&ids, Role::User, "a", Utc::now()).id.clone();
        let second = chat.push(&ids, Role::Buddy, "b", Utc::now()).id.clone();

        assert_ne!(first, second);
        assert_eq!(chat.messages()[0].content, "a");
        assert_eq!(chat.messages()[1].role, Role::Buddy);
    }

    #[test]
    fn test_blank_user_messages_use_placeholder() {
        let ids = IdGenerator::new();
        let mut chat = Conversation::new();
        chat.push(&ids, Role::User, "  ", Utc::now());

        let entry =
            summarize_conversation(&chat, &UserSettings::default(), &ids, Local::now()).unwrap();

        assert_eq!(entry.content, EMPTY_CONVERSATION_CONTENT);
    }

    #[test]
    fn test_summary_names_custom_character() {
        let ids = IdGenerator::new();
        let mut chat = Conversation::new();
        chat.push(&ids, Role::User, "hello", Utc::now());
        let settings = UserSettings {
            character_name: "Mochi".to_string(),
            ..UserSettings::default()
        };

        let entry = summarize_conversation(&chat, &settings, &ids, Local::now()).unwrap();

        assert!(entry.title.contains("Mochi"));
        assert_eq!(entry.tags.last().map(String::as_str), Some("Mochi"));
    }

    #[test]
    fn test_save_conversation_prepends_entry() {
        let store = RecordStore::in_memory();
        store.create_entry(&DiaryEntry::new("old", "Old", "old", "2024-01-01"));
        let ids = IdGenerator::new();
        let mut chat = Conversation::new();
        chat.push(&ids, Role::User, "hello", Utc::now());

        let entry = save_conversation(&store, &chat, &ids, Local::now()).unwrap();

        let stored = store.list_entries();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0], entry);
    }
}
