mod task;

pub use task::{TaskCompleted, TaskId, TaskSeq, TaskSlot};
