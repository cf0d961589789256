use thiserror::Error;

/// Pre-execution failures. Anything that goes wrong while a sub-task runs
/// is recorded on the sub-task instead.
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("task description is empty")]
    EmptyTask,

    #[error("Duplicate task ID: {0}")]
    DuplicateTaskId(String),

    #[error("setup failed: {0}")]
    Setup(String),
}
