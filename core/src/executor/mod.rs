//! Dependency-aware batch execution
//!
//! This module turns decomposed sub-tasks into a finished run:
//! - Dependency graph construction and Kahn layering into ready batches
//! - Detection of sub-tasks that can never run (missing or circular dependencies)
//! - Wave-barrier execution of each batch with bounded parallelism
//! - Per-batch failure policy and report assembly
//!
//! # Architecture
//!
//! ```text
//! description
//!   ↓
//! InputParser::decompose() → Vec<SubTask>
//!   ↓
//! TaskGraph::from_tasks() → layers() → Layering { batches, blocked }
//!   ↓
//! for batch in batches:
//!     execute_batch() → waves of ≤ maxParallelTasks → SubTaskRunner::run()
//!     FailurePolicy decides whether to continue
//!   ↓
//! TaskReport::from_task() → RunOutcome
//! ```

mod engine;
mod graph;
mod output;
mod progress;
mod runner;
mod scheduler;
pub mod traits;
pub mod types;

pub use engine::{RunPhase, TaskRunner, TaskRunnerBuilder};
pub use graph::{BlockedTask, Layering, TaskGraph};
pub use output::RunOutput;
pub use progress::ProgressMonitor;
pub use runner::{SubTaskRunner, VcsGate, VcsSession};
pub use scheduler::execute_batch;
pub use types::{BatchSummary, FailurePolicy, RunOptions, RunOutcome, TaskLike};
