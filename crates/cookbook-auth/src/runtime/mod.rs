//! Auth runtime - owns the state, runs the inbox loop, executes effects.
//!
//! All side effects happen here. The reducer stays pure and the effect
//! router only describes what to do; this module does it.
//!
//! ## Inbox Pattern
//!
//! - Front-ends send intents through a [`Dispatcher`]
//! - Spawned requests and the expiry timer send their results to the inbox
//! - The runtime is the only consumer, so actions apply in arrival order
//!
//! Structure:
//! - `mod.rs`: core runtime (AuthRuntime, inbox loop, effect dispatch)
//! - `inbox.rs`: inbox message and channel types
//! - `handlers.rs`: effect handler implementations (HTTP, storage)

mod handlers;
pub mod inbox;

use std::sync::Arc;

use chrono::Utc;
use cookbook_core::identity::{AuthError, IdentityApi};
use cookbook_core::session_store::SessionStore;
use cookbook_types::{AuthMode, Credentials, Route, Session};
use inbox::{InboxMessage, InboxReceiver, InboxSender};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::actions::AuthAction;
use crate::common::{TaskCompleted, TaskId, TaskSlot};
use crate::effects::{AuthEffect, effects_for};
use crate::navigation::Navigator;
use crate::reducer::reduce;
use crate::state::AuthState;
use crate::timer::ExpiryTimer;

/// Cloneable handle for sending actions to a runtime.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: InboxSender,
}

impl Dispatcher {
    /// Queues an action. Dropped with a log line if the runtime is gone.
    pub fn dispatch(&self, action: AuthAction) {
        let name = action.name();
        if self.tx.send(InboxMessage::Dispatch(action)).is_err() {
            tracing::debug!(action = name, "runtime gone; action dropped");
        }
    }
}

/// Auth lifecycle runtime.
///
/// Owns the auth state, the expiry timer and the in-flight request slot.
/// Must be driven from within a Tokio runtime.
pub struct AuthRuntime {
    state: AuthState,
    state_tx: watch::Sender<AuthState>,
    inbox_tx: InboxSender,
    inbox_rx: InboxReceiver,
    identity: Arc<dyn IdentityApi>,
    store: SessionStore,
    navigator: Arc<dyn Navigator>,
    timer: ExpiryTimer,
    authenticate: TaskSlot,
}

impl AuthRuntime {
    pub fn new(
        identity: Arc<dyn IdentityApi>,
        store: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(AuthState::default());
        let timer = ExpiryTimer::new(inbox_tx.clone());

        Self {
            state: AuthState::default(),
            state_tx,
            inbox_tx,
            inbox_rx,
            identity,
            store,
            navigator,
            timer,
            authenticate: TaskSlot::default(),
        }
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher {
            tx: self.inbox_tx.clone(),
        }
    }

    /// Receiver of state snapshots, updated after every reducer step.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn timer(&self) -> &ExpiryTimer {
        &self.timer
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Waits for the next inbox message and handles it.
    pub async fn step(&mut self) {
        if let Some(message) = self.inbox_rx.recv().await {
            self.handle(message);
        }
    }

    /// Handles every message already queued, without waiting.
    /// Returns how many were handled.
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.inbox_rx.try_recv() {
            self.handle(message);
            handled += 1;
        }
        handled
    }

    /// Handles messages until `done` holds for the state after a step.
    pub async fn run_until<P>(&mut self, mut done: P) -> AuthState
    where
        P: FnMut(&AuthState) -> bool,
    {
        loop {
            self.step().await;
            if done(&self.state) {
                return self.state.clone();
            }
        }
    }

    /// Handles messages until `shutdown` fires, then cancels pending work.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                Some(message) = self.inbox_rx.recv() => self.handle(message),
                else => break,
            }
        }

        self.authenticate.cancel();
        self.timer.cancel();
        tracing::debug!("auth runtime stopped");
    }

    fn handle(&mut self, message: InboxMessage) {
        match message {
            InboxMessage::Dispatch(action) => self.apply(action),
            InboxMessage::Authenticated(completed) => self.on_authenticated(completed),
            InboxMessage::TimerFired(id) => self.on_timer_fired(id),
        }
    }

    /// Reduces, publishes the snapshot, then executes the action's effects.
    fn apply(&mut self, action: AuthAction) {
        tracing::debug!(action = action.name(), "apply");
        self.state = reduce(&self.state, &action);
        self.state_tx.send_replace(self.state.clone());

        for effect in effects_for(&action) {
            self.execute_effect(effect);
        }
    }

    fn emit(&self, action: AuthAction) {
        let _ = self.inbox_tx.send(InboxMessage::Dispatch(action));
    }

    fn execute_effect(&mut self, effect: AuthEffect) {
        match effect {
            AuthEffect::Authenticate { mode, credentials } => {
                self.spawn_authenticate(mode, credentials);
            }
            AuthEffect::RestoreSession => {
                let now = Utc::now();
                match handlers::restore_session(&self.store, now) {
                    Some(session) => {
                        let remaining = session.remaining(now);
                        // Success is queued before the timer exists so an
                        // immediate firing cannot overtake it.
                        self.emit(AuthAction::AuthenticateSuccess {
                            session,
                            redirect: false,
                        });
                        self.timer.arm(remaining);
                    }
                    None => self.emit(AuthAction::Noop),
                }
            }
            AuthEffect::Navigate(route) => self.navigator.navigate(route),
            AuthEffect::EndSession => {
                self.timer.cancel();
                let removed = handlers::clear_session(&self.store);
                tracing::info!(removed, "session ended");
                self.navigator.navigate(Route::AuthEntry);
            }
        }
    }

    fn spawn_authenticate(&mut self, mode: AuthMode, credentials: Credentials) {
        let (id, cancel) = self.authenticate.start();
        let tx = self.inbox_tx.clone();
        let identity = Arc::clone(&self.identity);

        tracing::info!(mode = mode.as_str(), email = %credentials.email, "authenticating");

        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::debug!(task = id.0, "authentication superseded");
                    return;
                }
                result = handlers::authenticate(identity, mode, credentials) => result,
            };
            let _ = tx.send(InboxMessage::Authenticated(TaskCompleted { id, result }));
        });
    }

    fn on_authenticated(&mut self, completed: TaskCompleted<Result<Session, AuthError>>) {
        if !self.authenticate.finish_if_active(completed.id) {
            tracing::debug!(task = completed.id.0, "dropping stale authentication result");
            return;
        }

        match completed.result {
            Ok(session) => {
                tracing::info!(
                    email = %session.email,
                    expires_at = %session.expires_at,
                    "authenticated"
                );
                handlers::persist_session(&self.store, &session);
                self.timer.arm(session.remaining(Utc::now()));
                self.apply(AuthAction::AuthenticateSuccess {
                    session,
                    redirect: true,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "authentication failed");
                self.apply(AuthAction::AuthenticateFail(e.user_message().to_string()));
            }
        }
    }

    fn on_timer_fired(&mut self, id: TaskId) {
        if self.timer.on_fired(id) {
            tracing::info!("session expired");
            self.apply(AuthAction::Logout);
        }
    }
}
