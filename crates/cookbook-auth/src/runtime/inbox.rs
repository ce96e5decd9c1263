//! Inbox channel types.
//!
//! Every input to the runtime arrives here: front-end intents, results of
//! spawned requests and expiry timer firings. The runtime is the single
//! consumer, so messages are handled strictly in arrival order.

use cookbook_core::identity::AuthError;
use cookbook_types::Session;
use tokio::sync::mpsc;

use crate::actions::AuthAction;
use crate::common::{TaskCompleted, TaskId};

#[derive(Debug)]
pub enum InboxMessage {
    /// An action to run through the reducer and effect router.
    Dispatch(AuthAction),
    /// A login/signup request finished.
    Authenticated(TaskCompleted<Result<Session, AuthError>>),
    /// An expiry timer elapsed.
    TimerFired(TaskId),
}

pub type InboxSender = mpsc::UnboundedSender<InboxMessage>;
pub type InboxReceiver = mpsc::UnboundedReceiver<InboxMessage>;
