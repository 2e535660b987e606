use crate::model::{Subtask, Task};

use super::task_ops::TaskError;

/// Completion percentage derived from subtasks, rounded half up.
/// With no subtasks the task's own progress is authoritative and returned as is.
pub fn recompute_progress(task: &Task) -> u8 {
    let total = task.subtasks.len();
    if total == 0 {
        return task.progress;
    }
    let done = task.subtasks.iter().filter(|s| s.completed).count();
    // round(100 * done / total) with .5 going up, in integers
    let pct = (200 * done + total) / (2 * total);
    pct.min(100) as u8
}

/// Write the derived percentage back into `task.progress`
pub fn apply_progress(task: &mut Task) {
    task.progress = recompute_progress(task);
}

/// Flip one subtask's completion and recompute progress. Returns the new state.
pub fn toggle_subtask(task: &mut Task, index: usize) -> Result<bool, TaskError> {
    let subtask = task
        .subtasks
        .get_mut(index)
        .ok_or(TaskError::SubtaskOutOfRange(index))?;
    subtask.completed = !subtask.completed;
    let completed = subtask.completed;
    apply_progress(task);
    Ok(completed)
}

/// Append a subtask and recompute progress
pub fn add_subtask(task: &mut Task, subtask: Subtask) {
    task.subtasks.push(subtask);
    apply_progress(task);
}
