//! Effect handlers.
//!
//! These perform the I/O behind each [`crate::AuthEffect`]. They never touch
//! the auth state; the runtime turns their results into actions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use cookbook_core::identity::{AuthError, IdentityApi};
use cookbook_core::session_store::{SessionStore, mask_token};
use cookbook_types::{AuthMode, Credentials, Session};

/// Sends one authentication request and builds the granted session.
///
/// Expiry is measured from the moment the response arrives.
pub async fn authenticate(
    identity: Arc<dyn IdentityApi>,
    mode: AuthMode,
    credentials: Credentials,
) -> Result<Session, AuthError> {
    let response = identity.authenticate(mode, &credentials).await?;
    response.into_session(Utc::now())
}

/// Writes the session to durable storage.
///
/// A failed write is logged; the in-memory session stays valid.
pub fn persist_session(store: &SessionStore, session: &Session) {
    match store.save(session) {
        Ok(()) => tracing::debug!(path = %store.path().display(), "session persisted"),
        Err(e) => tracing::warn!(error = %format!("{e:#}"), "failed to persist session"),
    }
}

/// Loads the persisted session for auto-login.
///
/// Returns `None` when nothing usable is stored: no file, an unreadable
/// file, or a record without a token.
pub fn restore_session(store: &SessionStore, now: DateTime<Utc>) -> Option<Session> {
    let persisted = match store.load() {
        Ok(Some(persisted)) => persisted,
        Ok(None) => {
            tracing::debug!("no persisted session");
            return None;
        }
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "ignoring unreadable session");
            return None;
        }
    };

    let session = Session::from(persisted);
    if !session.has_token() {
        tracing::debug!("persisted session has no token");
        return None;
    }

    if session.is_expired(now) {
        // Restored anyway; the zero-delay timer logs it out right after.
        tracing::warn!(
            email = %session.email,
            expired_at = %session.expires_at,
            "restoring expired session"
        );
    } else {
        tracing::info!(
            email = %session.email,
            token = %mask_token(&session.token),
            "session restored"
        );
    }

    Some(session)
}

/// Deletes the persisted session. Returns whether one was stored.
pub fn clear_session(store: &SessionStore) -> bool {
    match store.clear() {
        Ok(removed) => removed,
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "failed to remove persisted session");
            false
        }
    }
}
