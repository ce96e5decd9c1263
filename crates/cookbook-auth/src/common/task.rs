use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug)]
pub struct TaskCompleted<R> {
    pub id: TaskId,
    pub result: R,
}

/// Holds at most one running task.
///
/// Starting a task cancels the previous one. Completions are only accepted
/// from the task currently in the slot, so late results from a replaced
/// task are dropped.
#[derive(Debug, Default)]
pub struct TaskSlot {
    seq: TaskSeq,
    active: Option<TaskId>,
    cancel: Option<CancellationToken>,
}

impl TaskSlot {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Cancels any running task and reserves the slot for a new one.
    pub fn start(&mut self) -> (TaskId, CancellationToken) {
        self.cancel();
        let id = self.seq.next_id();
        let token = CancellationToken::new();
        self.active = Some(id);
        self.cancel = Some(token.clone());
        (id, token)
    }

    /// Frees the slot if `id` is the running task. Returns whether it was.
    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
            self.cancel = None;
        }
        ok
    }

    /// Cancels the running task, if any. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        self.active = None;
        match self.cancel.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}
