use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{SubTask, Task, TaskResult, TaskStatus};

/// Read-only view of one sub-task, computed once when the run ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTaskReport {
    pub id: String,
    pub description: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<TaskResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&SubTask> for SubTaskReport {
    fn from(sub_task: &SubTask) -> Self {
        Self {
            id: sub_task.id.clone(),
            description: sub_task.description.clone(),
            status: sub_task.status,
            start_time: sub_task.start_time,
            end_time: sub_task.end_time,
            duration: sub_task.duration_ms(),
            result: sub_task.result.clone(),
            error: sub_task.error.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReport {
    pub task_id: String,
    pub description: String,
    pub total_sub_tasks: usize,
    pub completed_sub_tasks: usize,
    pub failed_sub_tasks: usize,
    pub skipped_sub_tasks: usize,
    #[serde(default)]
    pub blocked_sub_tasks: usize,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Milliseconds
    pub duration: i64,
    pub sub_task_reports: Vec<SubTaskReport>,
    pub summary: String,
}

impl TaskReport {
    pub fn from_task(task: &Task, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        let sub_task_reports: Vec<SubTaskReport> =
            task.sub_tasks.iter().map(SubTaskReport::from).collect();

        let mut report = Self {
            task_id: task.id.clone(),
            description: task.description.clone(),
            total_sub_tasks: task.sub_tasks.len(),
            completed_sub_tasks: task.count(TaskStatus::Completed),
            failed_sub_tasks: task.count(TaskStatus::Failed),
            skipped_sub_tasks: task.count(TaskStatus::Skipped),
            blocked_sub_tasks: task.count(TaskStatus::Blocked),
            start_time,
            end_time,
            duration: (end_time - start_time).num_milliseconds().max(0),
            sub_task_reports,
            summary: String::new(),
        };
        report.summary = report.build_summary();
        report
    }

    /// Any sub-task failed or never ran because of its dependencies.
    pub fn has_failures(&self) -> bool {
        self.failed_sub_tasks > 0 || self.blocked_sub_tasks > 0
    }

    /// Sub-tasks that reached no terminal status. Always zero for a
    /// finished run.
    pub fn unaccounted(&self) -> usize {
        self.total_sub_tasks.saturating_sub(
            self.completed_sub_tasks
                + self.failed_sub_tasks
                + self.skipped_sub_tasks
                + self.blocked_sub_tasks,
        )
    }

    fn build_summary(&self) -> String {
        let mut summary = format!(
            "Task \"{}\" completed.\nTotal sub-tasks: {}\nCompleted: {}\nFailed: {}\nSkipped: {}\n",
            self.description,
            self.total_sub_tasks,
            self.completed_sub_tasks,
            self.failed_sub_tasks,
            self.skipped_sub_tasks,
        );
        if self.blocked_sub_tasks > 0 {
            summary.push_str(&format!("Blocked: {}\n", self.blocked_sub_tasks));
        }

        let mut listed = self
            .sub_task_reports
            .iter()
            .filter(|r| matches!(r.status, TaskStatus::Failed | TaskStatus::Blocked))
            .peekable();
        if listed.peek().is_some() {
            summary.push_str("\nFailed tasks:\n");
            for r in listed {
                summary.push_str(&format!(
                    "- {}: {}\n",
                    r.description,
                    r.error.as_deref().unwrap_or("Unknown error")
                ));
            }
        }

        summary
    }
}
