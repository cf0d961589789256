//! Sub-task status transition rules.

use chrono::Utc;
use thiserror::Error;

use super::types::{SubTask, TaskResult, TaskStatus};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("invalid transition for {id}: {from} -> {to}")]
    InvalidTransition {
        id: String,
        from: TaskStatus,
        to: TaskStatus,
    },
    #[error("{id} is already terminal ({state})")]
    FromTerminalState { id: String, state: TaskStatus },
}

pub struct StatusTransition;

impl StatusTransition {
    pub fn validate(from: TaskStatus, to: TaskStatus) -> bool {
        if from.is_terminal() {
            return false;
        }

        match (from, to) {
            (TaskStatus::Pending, TaskStatus::InProgress) => true,
            // never picked up: halted run or starved by the batcher
            (TaskStatus::Pending, TaskStatus::Skipped) => true,
            (TaskStatus::Pending, TaskStatus::Blocked) => true,
            (TaskStatus::InProgress, TaskStatus::Completed) => true,
            (TaskStatus::InProgress, TaskStatus::Failed) => true,
            _ => false,
        }
    }
}

impl SubTask {
    fn transition(&mut self, to: TaskStatus) -> Result<(), TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError::FromTerminalState {
                id: self.id.clone(),
                state: self.status,
            });
        }
        if !StatusTransition::validate(self.status, to) {
            return Err(TransitionError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// PENDING -> IN_PROGRESS, stamping the start time.
    pub fn begin(&mut self) -> Result<(), TransitionError> {
        self.transition(TaskStatus::InProgress)?;
        self.start_time = Some(Utc::now());
        Ok(())
    }

    /// IN_PROGRESS -> COMPLETED.
    pub fn complete(&mut self, result: TaskResult) -> Result<(), TransitionError> {
        self.transition(TaskStatus::Completed)?;
        self.result = Some(result);
        self.end_time = Some(Utc::now());
        Ok(())
    }

    /// IN_PROGRESS -> FAILED, keeping the error text for the report.
    pub fn fail(
        &mut self,
        result: TaskResult,
        error: impl Into<String>,
    ) -> Result<(), TransitionError> {
        self.transition(TaskStatus::Failed)?;
        self.result = Some(result);
        self.error = Some(error.into());
        self.end_time = Some(Utc::now());
        Ok(())
    }

    /// PENDING -> SKIPPED.
    pub fn skip(&mut self, reason: impl Into<String>) -> Result<(), TransitionError> {
        self.transition(TaskStatus::Skipped)?;
        self.error = Some(reason.into());
        Ok(())
    }

    /// PENDING -> BLOCKED.
    pub fn block(&mut self, reason: impl Into<String>) -> Result<(), TransitionError> {
        self.transition(TaskStatus::Blocked)?;
        self.error = Some(reason.into());
        Ok(())
    }
}
