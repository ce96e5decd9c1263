//! Authentication session lifecycle.
//!
//! Elm-style split:
//! - `reducer`: pure state transitions over [`AuthAction`]s
//! - `effects`: which side effects an action triggers
//! - `runtime`: owns the state, the inbox and the timer, executes effects
//!
//! Front-ends drive everything through a [`Dispatcher`] and observe
//! [`AuthState`] snapshots.

pub mod actions;
pub mod common;
pub mod effects;
pub mod navigation;
pub mod reducer;
pub mod runtime;
pub mod state;
pub mod timer;

pub use actions::AuthAction;
pub use effects::AuthEffect;
pub use navigation::{Navigator, RouteHistory};
pub use reducer::reduce;
pub use runtime::{AuthRuntime, Dispatcher};
pub use state::AuthState;
pub use timer::ExpiryTimer;
