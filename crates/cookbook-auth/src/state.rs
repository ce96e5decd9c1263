//! Auth state snapshot.

use cookbook_types::Session;

/// Current authentication state.
///
/// Mutated only by [`crate::reduce`] inside the runtime; everything else
/// reads cloned snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub session: Option<Session>,
    /// Message from the last failed authentication.
    pub error: Option<String>,
    /// True while a login/signup request is outstanding.
    pub loading: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}
