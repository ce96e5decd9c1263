//! Actions accepted by the auth lifecycle.

use cookbook_types::{AuthMode, Credentials, Session};

/// Everything that can happen to the auth state.
///
/// Intent actions (`LoginStart`, `SignupStart`, `AutoLogin`, `Logout`,
/// `ClearError`) come from the front-end. Result actions
/// (`AuthenticateSuccess`, `AuthenticateFail`, `Noop`) are produced by
/// effect handlers and fed back through the inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    LoginStart(Credentials),
    SignupStart(Credentials),
    AuthenticateSuccess {
        session: Session,
        /// Navigate home after the state update.
        redirect: bool,
    },
    /// User-facing error message.
    AuthenticateFail(String),
    AutoLogin,
    Logout,
    ClearError,
    /// Result of an effect that changes nothing.
    Noop,
}

impl AuthAction {
    /// The authentication request an intent action asks for, if any.
    pub fn auth_request(&self) -> Option<(AuthMode, &Credentials)> {
        match self {
            AuthAction::LoginStart(credentials) => Some((AuthMode::Login, credentials)),
            AuthAction::SignupStart(credentials) => Some((AuthMode::Signup, credentials)),
            _ => None,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            AuthAction::LoginStart(_) => "login_start",
            AuthAction::SignupStart(_) => "signup_start",
            AuthAction::AuthenticateSuccess { .. } => "authenticate_success",
            AuthAction::AuthenticateFail(_) => "authenticate_fail",
            AuthAction::AutoLogin => "auto_login",
            AuthAction::Logout => "logout",
            AuthAction::ClearError => "clear_error",
            AuthAction::Noop => "noop",
        }
    }
}
