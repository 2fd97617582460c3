//! Workflows the collaborator runs on top of the store and the engines.
//!
//! These are the only places where user input is validated. Each operation
//! surfaces failures as `AppError` rather than degrading silently.

pub mod account;
pub mod compose;
pub mod conversation;
pub mod report;
pub mod settings;

// Re-export commonly used functions
pub use account::{delete_account, is_signed_in, sign_in};
pub use compose::{build_entry, create_entry, revise_entry, update_entry, EntryDraft};
pub use conversation::{save_conversation, summarize_conversation, Conversation};
pub use report::{build_report, Report};
pub use settings::{update_settings, SettingsPatch};
