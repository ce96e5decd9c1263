//! Session expiry timer.

use std::time::Duration;

use chrono::TimeDelta;

use crate::common::{TaskId, TaskSlot};
use crate::runtime::inbox::{InboxMessage, InboxSender};

/// Single-slot timer that reports expiry to the runtime inbox.
///
/// At most one timer is pending. Arming replaces the pending timer, and a
/// firing is only honoured (via [`ExpiryTimer::on_fired`]) if it comes from
/// the timer currently in the slot.
#[derive(Debug)]
pub struct ExpiryTimer {
    slot: TaskSlot,
    inbox: InboxSender,
}

impl ExpiryTimer {
    pub fn new(inbox: InboxSender) -> Self {
        Self {
            slot: TaskSlot::default(),
            inbox,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.slot.is_running()
    }

    /// Schedules a firing after `remaining`, cancelling any pending one.
    /// Negative durations fire immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn arm(&mut self, remaining: TimeDelta) {
        let delay = remaining.to_std().unwrap_or(Duration::ZERO);
        let (id, cancel) = self.slot.start();
        let tx = self.inbox.clone();

        tracing::debug!(delay_secs = delay.as_secs(), "expiry timer armed");

        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    let _ = tx.send(InboxMessage::TimerFired(id));
                }
            }
        });
    }

    /// Cancels the pending timer. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.slot.cancel();
        if cancelled {
            tracing::debug!("expiry timer cancelled");
        }
        cancelled
    }

    /// Clears the slot for a firing. Returns `false` for stale firings.
    pub fn on_fired(&mut self, id: TaskId) -> bool {
        self.slot.finish_if_active(id)
    }
}
