//! Record types owned by the store.
//!
//! These are the three durable record kinds (diary entries, user settings and
//! the session marker) plus the conversation messages nested inside entries.
//! The serde attributes define the JSON wire format: camelCase field names,
//! optional fields omitted when absent.

pub mod dates;
pub mod ids;

use crate::constants::{
    DEFAULT_CHARACTER_NAME, DEFAULT_NICKNAME, DEFAULT_THEME_COLOR, TAG_MARKER,
};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use ids::IdGenerator;

/// One diary record.
///
/// `date` is kept as the ISO-8601 string it was written with; use
/// [`DiaryEntry::timestamp`] or [`DiaryEntry::local_day`] for temporal work.
///
/// # Examples
///
/// ```
/// use buddy_diary::diary::DiaryEntry;
///
/// let entry = DiaryEntry::new("1", "Walk", "Went to the river", "2024-01-15T18:00:00");
/// assert!(entry.tags.is_empty());
/// assert_eq!(entry.local_day().unwrap().to_string(), "2024-01-15");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    /// Opaque identifier, unique across the collection by caller convention.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Tags without their `#` marker, in the order the user added them.
    #[serde(default)]
    pub tags: Vec<String>,
    /// ISO-8601 timestamp; authoritative for every day-based computation.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    /// Opaque image URIs or paths.
    #[serde(default)]
    pub images: Vec<String>,
    /// Transcript of the conversation this entry was summarized from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
}

impl DiaryEntry {
    /// Creates an entry with no tags, emotion, images or transcript.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        DiaryEntry {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            date: date.into(),
            emotion: None,
            images: Vec::new(),
            messages: None,
        }
    }

    /// Parses `date` into a local timestamp, or `None` if it is not a
    /// recognized ISO-8601 form.
    pub fn timestamp(&self) -> Option<DateTime<Local>> {
        dates::parse_timestamp(&self.date)
    }

    /// The local calendar day the entry belongs to.
    pub fn local_day(&self) -> Option<NaiveDate> {
        self.timestamp().map(|ts| ts.date_naive())
    }

    /// Whether the entry carries `tag` exactly (case-sensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Who wrote a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    /// The buddy character answering the user.
    #[serde(alias = "assistant")]
    Buddy,
}

/// A single conversation message, immutable once attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// User preferences. Exactly one instance per installation.
///
/// Fields missing from a stored object fall back to their defaults
/// individually.
///
/// # Examples
///
/// ```
/// use buddy_diary::diary::UserSettings;
///
/// let settings: UserSettings = serde_json::from_str(r#"{"nickname":"Mina"}"#).unwrap();
/// assert_eq!(settings.nickname, "Mina");
/// assert_eq!(settings.character_name, "Buddy");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub nickname: String,
    pub character_name: String,
    /// Hex color string, e.g. `#7C3AED`.
    pub theme_color: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        UserSettings {
            nickname: DEFAULT_NICKNAME.to_string(),
            character_name: DEFAULT_CHARACTER_NAME.to_string(),
            theme_color: DEFAULT_THEME_COLOR.to_string(),
        }
    }
}

/// Local "logged in" marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub name: String,
    pub is_logged_in: bool,
}

impl Session {
    /// A marker for `name` in the logged-in state.
    pub fn signed_in(name: impl Into<String>) -> Self {
        Session {
            name: name.into(),
            is_logged_in: true,
        }
    }
}

/// Removes every `#` marker and surrounding whitespace from a raw tag.
///
/// ```
/// use buddy_diary::diary::clean_tag;
///
/// assert_eq!(clean_tag("  #work "), "work");
/// assert_eq!(clean_tag("##a#b"), "ab");
/// ```
pub fn clean_tag(raw: &str) -> String {
    raw.replace(TAG_MARKER, "").trim().to_string()
}

/// Cleans a list of raw tags, dropping empty results and later duplicates.
pub fn clean_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let cleaned = clean_tag(tag.as_ref());
        if !cleaned.is_empty() && !tags.contains(&cleaned) {
            tags.push(cleaned);
        }
    }
    tags
}
