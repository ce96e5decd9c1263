//! Navigation sink.

use std::sync::{Mutex, PoisonError};

use cookbook_types::Route;

/// Receives navigation requests from the effect pipeline.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that records every route it is sent to.
#[derive(Debug, Default)]
pub struct RouteHistory {
    routes: Mutex<Vec<Route>>,
}

impl RouteHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// All routes navigated to, oldest first.
    pub fn routes(&self) -> Vec<Route> {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The current route, if any navigation happened.
    pub fn current(&self) -> Option<Route> {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }
}

impl Navigator for RouteHistory {
    fn navigate(&self, route: Route) {
        tracing::debug!(route = %route, "navigate");
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}
