//! Human-facing progress output for a run.
//!
//! Plain lines go to stderr when the run is verbose; a progress bar replaces
//! them when requested. Everything is mirrored to `tracing` regardless.

use std::sync::Mutex;

use crate::report::TaskReport;
use crate::task::{SubTask, TaskStatus};

use super::progress::ProgressMonitor;

pub struct RunOutput {
    verbose: bool,
    monitor: Option<Mutex<ProgressMonitor>>,
}

impl RunOutput {
    pub fn new(verbose: bool, progress_bar: bool, total_sub_tasks: usize) -> Self {
        let monitor =
            progress_bar.then(|| Mutex::new(ProgressMonitor::new(total_sub_tasks, true)));
        Self { verbose, monitor }
    }

    /// Print nothing, only trace.
    pub fn quiet() -> Self {
        Self {
            verbose: false,
            monitor: None,
        }
    }

    fn lines(&self) -> bool {
        self.verbose && self.monitor.is_none()
    }

    fn with_monitor(&self, f: impl FnOnce(&mut ProgressMonitor)) {
        if let Some(monitor) = &self.monitor {
            if let Ok(mut guard) = monitor.lock() {
                f(&mut guard);
            }
        }
    }

    pub fn emit_run_start(&self, task_id: &str, total: usize, batches: &[Vec<String>]) {
        tracing::info!(task_id, sub_tasks = total, batches = batches.len(), "run started");
        if self.lines() {
            eprintln!(
                "🚀 Running {} sub-task(s) in {} batch(es)",
                total,
                batches.len()
            );
            eprintln!("📋 Execution Plan:");
            for (i, ids) in batches.iter().enumerate() {
                eprintln!("  Batch {}: {}", i + 1, ids.join(", "));
            }
        }
    }

    pub fn emit_branch(&self, branch: &str) {
        tracing::info!(branch, "created branch");
        if self.lines() {
            eprintln!("🌿 Working on branch {branch}");
        }
    }

    pub fn emit_blocked(&self, sub_task: &SubTask) {
        let reason = sub_task.error.as_deref().unwrap_or("blocked");
        tracing::warn!(sub_task = %sub_task.id, "{reason}");
        if self.lines() {
            eprintln!("  🚫 {} {}", sub_task.id, reason);
        }
        self.with_monitor(|m| m.advance(1));
    }

    pub fn emit_batch_start(&self, batch: usize, total_batches: usize, size: usize) {
        tracing::info!(batch = batch + 1, total_batches, size, "batch started");
        if self.lines() {
            eprintln!("▶ Batch {}/{} ({} sub-task(s))", batch + 1, total_batches, size);
        }
        self.with_monitor(|m| m.update_batch(batch, total_batches));
    }

    pub fn emit_task_start(&self, sub_task: &SubTask) {
        tracing::debug!(sub_task = %sub_task.id, "started: {}", sub_task.description);
        if self.lines() {
            eprintln!("  ⏳ {}: {}", sub_task.id, sub_task.description);
        }
        self.with_monitor(|m| m.add_task(&sub_task.id, &sub_task.description));
    }

    pub fn emit_task_end(&self, sub_task: &SubTask) {
        let ms = sub_task.duration_ms().unwrap_or(0);
        let success = sub_task.status == TaskStatus::Completed;
        match (&sub_task.error, success) {
            (Some(err), false) => {
                tracing::warn!(sub_task = %sub_task.id, duration_ms = ms, "failed: {err}")
            }
            _ => tracing::debug!(sub_task = %sub_task.id, duration_ms = ms, status = %sub_task.status, "finished"),
        }
        if self.lines() {
            if success {
                eprintln!("  ✅ {} ({}ms)", sub_task.id, ms);
            } else {
                eprintln!(
                    "  ❌ {}: {}",
                    sub_task.id,
                    sub_task.error.as_deref().unwrap_or("failed")
                );
            }
        }
        self.with_monitor(|m| m.complete_task(&sub_task.id, success, ms));
    }

    pub fn emit_halt(&self, batch: usize, skipped: usize) {
        tracing::warn!(batch = batch + 1, skipped, "halting after failed batch");
        if self.lines() {
            eprintln!(
                "⛔ Batch {} failed; skipping {} remaining sub-task(s)",
                batch + 1,
                skipped
            );
        }
        self.with_monitor(|m| m.advance(skipped));
    }

    pub fn emit_run_end(&self, report: &TaskReport) {
        tracing::info!(
            task_id = %report.task_id,
            completed = report.completed_sub_tasks,
            failed = report.failed_sub_tasks,
            skipped = report.skipped_sub_tasks,
            blocked = report.blocked_sub_tasks,
            duration_ms = report.duration,
            "run finished"
        );
        if self.lines() {
            eprintln!(
                "🏁 {}/{} sub-task(s) completed",
                report.completed_sub_tasks, report.total_sub_tasks
            );
        }
        self.with_monitor(|m| m.finish(!report.has_failures()));
    }
}
