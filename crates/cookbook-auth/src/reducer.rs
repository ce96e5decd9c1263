//! Auth reducer.
//!
//! Pure and total: no I/O, and every action maps to exactly one next state.

use crate::actions::AuthAction;
use crate::state::AuthState;

/// Returns the state after applying `action` to `state`.
pub fn reduce(state: &AuthState, action: &AuthAction) -> AuthState {
    match action {
        AuthAction::LoginStart(_) | AuthAction::SignupStart(_) => AuthState {
            session: state.session.clone(),
            error: None,
            loading: true,
        },
        AuthAction::AuthenticateSuccess { session, .. } => AuthState {
            session: Some(session.clone()),
            error: None,
            loading: false,
        },
        AuthAction::AuthenticateFail(message) => AuthState {
            session: state.session.clone(),
            error: Some(message.clone()),
            loading: false,
        },
        AuthAction::Logout => AuthState {
            session: None,
            ..state.clone()
        },
        AuthAction::ClearError => AuthState {
            error: None,
            ..state.clone()
        },
        AuthAction::AutoLogin | AuthAction::Noop => state.clone(),
    }
}
