//! Partial updates of the user settings.

use crate::diary::UserSettings;
use crate::errors::{AppError, AppResult};
use crate::store::RecordStore;
use tracing::info;

/// Fields to change; `None` leaves the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub nickname: Option<String>,
    pub character_name: Option<String>,
    pub theme_color: Option<String>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none() && self.character_name.is_none() && self.theme_color.is_none()
    }

    /// Returns `current` with every present field replaced.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a blank name or a theme color that
    /// is not of the form `#RRGGBB`.
    pub fn apply(&self, current: &UserSettings) -> AppResult<UserSettings> {
        let mut merged = current.clone();

        if let Some(nickname) = &self.nickname {
            merged.nickname = non_blank("Nickname", nickname)?;
        }
        if let Some(character_name) = &self.character_name {
            merged.character_name = non_blank("Character name", character_name)?;
        }
        if let Some(color) = &self.theme_color {
            if !is_hex_color(color) {
                return Err(AppError::Validation(format!(
                    "Theme color '{}' must look like #RRGGBB",
                    color
                )));
            }
            merged.theme_color = color.clone();
        }
        Ok(merged)
    }
}

fn non_blank(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} cannot be empty", field)));
    }
    Ok(trimmed.to_string())
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .map_or(false, |hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Merges `patch` over the stored settings and saves the result wholesale.
///
/// # Examples
///
/// ```
/// use buddy_diary::ops::settings::{update_settings, SettingsPatch};
/// use buddy_diary::store::RecordStore;
///
/// let store = RecordStore::in_memory();
/// let patch = SettingsPatch { nickname: Some("Mina".to_string()), ..SettingsPatch::default() };
///
/// let settings = update_settings(&store, &patch).unwrap();
/// assert_eq!(settings.nickname, "Mina");
/// assert_eq!(store.get_settings().character_name, "Buddy");
/// ```
pub fn update_settings(store: &RecordStore, patch: &SettingsPatch) -> AppResult<UserSettings> {
    let merged = patch.apply(&store.get_settings())?;
    store.try_save_settings(&merged)?;
    info!("Settings updated");
    Ok(merged)
}
