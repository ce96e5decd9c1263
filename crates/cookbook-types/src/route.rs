//! Navigation destinations.

use std::fmt;

/// A place the front-end can be sent to after a lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing page shown to an authenticated user.
    Home,
    /// Login / signup entry page.
    AuthEntry,
}

impl Route {
    /// Returns the path the route is mounted at.
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::AuthEntry => "/auth",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
