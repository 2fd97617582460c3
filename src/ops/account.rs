//! The local session marker and account reset.
//!
//! There is no authentication; signing in only records a display name.

use crate::diary::Session;
use crate::errors::{AppError, AppResult};
use crate::store::RecordStore;
use tracing::{info, warn};

/// Records `name` as the signed-in user.
pub fn sign_in(store: &RecordStore, name: &str) -> AppResult<Session> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name cannot be empty".to_string()));
    }

    let session = Session::signed_in(name);
    store.try_set_session(&session)?;
    info!("Signed in");
    Ok(session)
}

/// Whether a session marker exists and is marked logged in.
pub fn is_signed_in(store: &RecordStore) -> bool {
    store
        .get_session()
        .map_or(false, |session| session.is_logged_in)
}

/// Erases entries, settings and the session marker.
pub fn delete_account(store: &RecordStore) -> AppResult<()> {
    warn!("Deleting all diary data");
    store.try_clear_all()?;
    Ok(())
}
