//! Turning editor input into stored entries.

use crate::diary::dates::parse_timestamp;
use crate::diary::{clean_tags, DiaryEntry, IdGenerator};
use crate::errors::{AppError, AppResult};
use crate::store::RecordStore;
use chrono::{DateTime, Local, SecondsFormat};
use tracing::{debug, info};

/// What the user typed into the entry editor.
///
/// Tags may still carry their `#` markers; they are cleaned when the draft is
/// turned into an entry. A `date` of `None` means "now" for a new entry and
/// "unchanged" when revising.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub emotion: Option<String>,
    pub images: Vec<String>,
    pub date: Option<String>,
}

impl EntryDraft {
    /// A draft pre-filled from an existing entry, for editing.
    pub fn from_entry(entry: &DiaryEntry) -> Self {
        EntryDraft {
            title: entry.title.clone(),
            content: entry.content.clone(),
            tags: entry.tags.clone(),
            emotion: entry.emotion.clone(),
            images: entry.images.clone(),
            date: Some(entry.date.clone()),
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(AppError::Validation("Content is required".to_string()));
        }
        if let Some(date) = &self.date {
            if parse_timestamp(date).is_none() {
                return Err(AppError::InvalidDate(date.clone()));
            }
        }
        Ok(())
    }

    fn emotion(&self) -> Option<String> {
        self.emotion
            .as_deref()
            .map(str::trim)
            .filter(|emotion| !emotion.is_empty())
            .map(str::to_string)
    }
}

/// Builds a new entry from `draft` with a fresh id.
///
/// # Errors
///
/// Returns `AppError::Validation` for a blank title or content, and
/// `AppError::InvalidDate` if the draft's date does not parse.
///
/// # Examples
///
/// ```
/// use buddy_diary::diary::IdGenerator;
/// use buddy_diary::ops::compose::{build_entry, EntryDraft};
/// use chrono::Local;
///
/// let draft = EntryDraft {
///     title: "Walk".to_string(),
///     content: "Down by the river".to_string(),
///     tags: vec!["#outside".to_string(), " outside ".to_string()],
///     ..EntryDraft::default()
/// };
///
/// let entry = build_entry(&draft, &IdGenerator::new(), Local::now()).unwrap();
/// assert_eq!(entry.tags, vec!["outside"]);
/// ```
pub fn build_entry(draft: &EntryDraft, ids: &IdGenerator, now: DateTime<Local>) -> AppResult<DiaryEntry> {
    draft.validate()?;

    let date = draft
        .date
        .clone()
        .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, false));

    Ok(DiaryEntry {
        id: ids.next_id(),
        title: draft.title.trim().to_string(),
        content: draft.content.clone(),
        tags: clean_tags(&draft.tags),
        date,
        emotion: draft.emotion(),
        images: draft.images.clone(),
        messages: None,
    })
}

/// Applies `draft` to `existing`, keeping its id and conversation transcript.
pub fn revise_entry(existing: &DiaryEntry, draft: &EntryDraft) -> AppResult<DiaryEntry> {
    draft.validate()?;

    Ok(DiaryEntry {
        id: existing.id.clone(),
        title: draft.title.trim().to_string(),
        content: draft.content.clone(),
        tags: clean_tags(&draft.tags),
        date: draft.date.clone().unwrap_or_else(|| existing.date.clone()),
        emotion: draft.emotion(),
        images: draft.images.clone(),
        messages: existing.messages.clone(),
    })
}

/// Builds an entry from `draft` and stores it at the head of the collection.
pub fn create_entry(
    store: &RecordStore,
    ids: &IdGenerator,
    draft: &EntryDraft,
    now: DateTime<Local>,
) -> AppResult<DiaryEntry> {
    let entry = build_entry(draft, ids, now)?;
    store.try_create_entry(&entry)?;
    info!("Composed entry {}", entry.id);
    Ok(entry)
}

/// Replaces the stored entry `id` with `draft` applied to it.
///
/// # Errors
///
/// Returns `AppError::NotFound` if no entry has `id`, plus the validation
/// errors of [`build_entry`].
pub fn update_entry(store: &RecordStore, id: &str, draft: &EntryDraft) -> AppResult<DiaryEntry> {
    let existing = store
        .try_get_entry(id)?
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;

    let revised = revise_entry(&existing, draft)?;
    if !store.try_update_entry(&revised)? {
        // Deleted between the read and the write
        return Err(AppError::NotFound(id.to_string()));
    }
    debug!("Revised entry {}", id);
    Ok(revised)
}
