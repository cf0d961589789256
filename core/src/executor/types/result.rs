use crate::report::TaskReport;
use crate::task::Task;

/// What happened while one batch was executed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Sizes of the waves in launch order
    pub wave_sizes: Vec<usize>,
    pub completed: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// A finished run: the mutated task plus the report derived from it.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub task: Task,
    pub report: TaskReport,
    /// Number of batches produced by the batcher
    pub batches: usize,
    /// Set when the failure policy stopped the run early
    pub halted_after_batch: Option<usize>,
}

impl RunOutcome {
    /// 0: every sub-task completed or was skipped.
    /// 1: a sub-task failed or was blocked.
    pub fn exit_code(&self) -> i32 {
        if self.report.has_failures() {
            1
        } else {
            0
        }
    }
}
