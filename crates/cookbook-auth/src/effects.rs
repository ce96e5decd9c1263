//! Auth effect types.
//!
//! Effects describe the side effects an action triggers. The runtime
//! executes them after the reducer has produced the new state, so the
//! reducer never performs I/O.

use cookbook_types::{AuthMode, Credentials, Route};

use crate::actions::AuthAction;

/// Side effects for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEffect {
    /// Send a login/signup request. A newer request replaces an in-flight one.
    Authenticate {
        mode: AuthMode,
        credentials: Credentials,
    },

    /// Load the persisted session and resume it.
    RestoreSession,

    /// Send the front-end somewhere.
    Navigate(Route),

    /// Cancel the expiry timer, delete the persisted session and return to
    /// the auth entry page.
    EndSession,
}

/// Returns the effects `action` triggers, in execution order.
pub fn effects_for(action: &AuthAction) -> Vec<AuthEffect> {
    match action {
        AuthAction::LoginStart(_) | AuthAction::SignupStart(_) => action
            .auth_request()
            .map(|(mode, credentials)| AuthEffect::Authenticate {
                mode,
                credentials: credentials.clone(),
            })
            .into_iter()
            .collect(),
        AuthAction::AutoLogin => vec![AuthEffect::RestoreSession],
        AuthAction::AuthenticateSuccess { redirect: true, .. } => {
            vec![AuthEffect::Navigate(Route::Home)]
        }
        AuthAction::Logout => vec![AuthEffect::EndSession],
        AuthAction::AuthenticateSuccess { redirect: false, .. }
        | AuthAction::AuthenticateFail(_)
        | AuthAction::ClearError
        | AuthAction::Noop => vec![],
    }
}
