mod transitions;
mod types;

pub use transitions::{StatusTransition, TransitionError};
pub use types::{
    BuildResult, GitChanges, LintingResult, SubTask, Task, TaskResult, TaskStatus, TestResult,
    VerificationResult,
};
