//! Input Processing Module
//!
//! Turns the operator's task description into positional sub-tasks
//! (`task-1`, `task-2`, ...) that the executor can batch.

mod parser;

pub use parser::{step_id, InputParser, Step};
