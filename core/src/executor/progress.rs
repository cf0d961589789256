use std::collections::HashMap;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress bars for a run: one overall bar plus a spinner per in-flight
/// sub-task.
pub struct ProgressMonitor {
    multi: MultiProgress,
    overall: ProgressBar,
    task_bars: HashMap<String, ProgressBar>,
    enabled: bool,
}

impl ProgressMonitor {
    /// Create a new progress monitor
    ///
    /// # Arguments
    ///
    /// * `total_sub_tasks` - Every sub-task in the run, including ones that will never execute
    /// * `enabled` - Draw nothing when false
    pub fn new(total_sub_tasks: usize, enabled: bool) -> Self {
        if !enabled {
            return Self {
                multi: MultiProgress::new(),
                overall: ProgressBar::hidden(),
                task_bars: HashMap::new(),
                enabled: false,
            };
        }

        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(total_sub_tasks as u64));
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} sub-tasks ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░  ");
        overall.set_style(style);
        overall.set_message("Starting...");

        Self {
            multi,
            overall,
            task_bars: HashMap::new(),
            enabled: true,
        }
    }

    /// Start a spinner for a sub-task that just went IN_PROGRESS
    pub fn add_task(&mut self, id: &str, description: &str) {
        if !self.enabled {
            return;
        }

        let bar = self.multi.add(ProgressBar::new_spinner());
        let style = ProgressStyle::default_spinner()
            .template("  {spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        bar.set_style(style);
        bar.set_message(format!("⏳ {id}: {description}"));
        bar.enable_steady_tick(Duration::from_millis(100));

        self.task_bars.insert(id.to_string(), bar);
    }

    pub fn complete_task(&mut self, id: &str, success: bool, duration_ms: i64) {
        if !self.enabled {
            return;
        }

        if let Some(bar) = self.task_bars.remove(id) {
            let icon = if success { "✅" } else { "❌" };
            bar.finish_with_message(format!("{icon} {id} ({duration_ms}ms)"));
        }

        self.overall.inc(1);
    }

    /// Count sub-tasks that reached a terminal status without running.
    pub fn advance(&self, n: usize) {
        if self.enabled && n > 0 {
            self.overall.inc(n as u64);
        }
    }

    pub fn update_batch(&self, batch: usize, total_batches: usize) {
        if self.enabled {
            self.overall
                .set_message(format!("Batch {}/{}", batch + 1, total_batches));
        }
    }

    pub fn finish(&self, success: bool) {
        if !self.enabled {
            return;
        }

        let msg = if success {
            "✅ All sub-tasks completed"
        } else {
            "❌ Some sub-tasks did not complete"
        };

        self.overall.finish_with_message(msg.to_string());
    }
}

impl Drop for ProgressMonitor {
    fn drop(&mut self) {
        for (_, bar) in self.task_bars.drain() {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_monitor_is_inert() {
        let mut monitor = ProgressMonitor::new(3, false);
        assert!(!monitor.enabled);

        monitor.add_task("task-1", "build");
        monitor.complete_task("task-1", true, 100);
        monitor.advance(2);
        monitor.finish(true);
        assert!(monitor.task_bars.is_empty());
    }

    #[test]
    fn enabled_monitor_tracks_spinners() {
        let mut monitor = ProgressMonitor::new(3, true);

        monitor.add_task("task-1", "build");
        monitor.add_task("task-2", "test");
        assert_eq!(monitor.task_bars.len(), 2);

        monitor.complete_task("task-1", true, 100);
        monitor.complete_task("task-2", false, 200);
        monitor.advance(1);
        assert!(monitor.task_bars.is_empty());
        assert_eq!(monitor.overall.position(), 3);

        monitor.update_batch(0, 2);
        monitor.finish(false);
    }
}
