pub mod classify;
pub mod forms;
pub mod progress;
pub mod task_ops;
