use std::fmt::Write;

use crate::config::OutputFormat;
use crate::task::TaskStatus;

use super::model::TaskReport;

const BANNER_WIDTH: usize = 80;

/// Render `report` in the requested format.
pub fn render(report: &TaskReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(format_text(report)),
        OutputFormat::Json => format_json(report),
        OutputFormat::Markdown => Ok(format_markdown(report)),
    }
}

pub fn format_json(report: &TaskReport) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn format_text(report: &TaskReport) -> String {
    let banner = "=".repeat(BANNER_WIDTH);
    let rule = "-".repeat(BANNER_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "{banner}");
    let _ = writeln!(out, "TASK EXECUTION REPORT");
    let _ = writeln!(out, "{banner}\n");

    let _ = writeln!(out, "Task: {}", report.description);
    let _ = writeln!(out, "Task ID: {}", report.task_id);
    let _ = writeln!(out, "Start Time: {}", report.start_time.to_rfc3339());
    let _ = writeln!(out, "End Time: {}", report.end_time.to_rfc3339());
    let _ = writeln!(out, "Duration: {}\n", format_duration(report.duration));

    let _ = writeln!(out, "Summary:");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Total Sub-tasks: {}", report.total_sub_tasks);
    let _ = writeln!(out, "Completed: {}", report.completed_sub_tasks);
    let _ = writeln!(out, "Failed: {}", report.failed_sub_tasks);
    let _ = writeln!(out, "Skipped: {}", report.skipped_sub_tasks);
    if report.blocked_sub_tasks > 0 {
        let _ = writeln!(out, "Blocked: {}", report.blocked_sub_tasks);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Sub-tasks:");
    let _ = writeln!(out, "{rule}");
    for (index, sub) in report.sub_task_reports.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {}", index + 1, sub.description);
        let _ = writeln!(out, "   Status: {}", sub.status);
        if let Some(ms) = sub.duration.filter(|ms| *ms > 0) {
            let _ = writeln!(out, "   Duration: {}", format_duration(ms));
        }
        if let Some(result) = &sub.result {
            let _ = writeln!(out, "   Success: {}", result.success);
            if let Some(v) = &result.verification {
                let verdict = if v.passed { "PASSED" } else { "FAILED" };
                let _ = writeln!(out, "   Verification: {verdict}");
            }
            if let Some(changes) = result.git_changes.as_ref() {
                if !changes.files_changed.is_empty() {
                    let _ = writeln!(
                        out,
                        "   Files Changed: {}",
                        changes.files_changed.join(", ")
                    );
                }
                if let Some(commit) = &changes.commit {
                    let _ = writeln!(out, "   Commit: {commit}");
                }
            }
        }
        if let Some(err) = &sub.error {
            let _ = writeln!(out, "   Error: {err}");
        }
    }

    let _ = writeln!(out, "\n{banner}");
    out.push_str(&report.summary);
    let _ = writeln!(out, "{banner}");
    out
}

pub fn format_markdown(report: &TaskReport) -> String {
    let mut out = String::from("# Task Execution Report\n\n");

    let _ = writeln!(out, "## Task: {}\n", report.description);
    let _ = writeln!(out, "- **Task ID**: {}", report.task_id);
    let _ = writeln!(out, "- **Start Time**: {}", report.start_time.to_rfc3339());
    let _ = writeln!(out, "- **End Time**: {}", report.end_time.to_rfc3339());
    let _ = writeln!(out, "- **Duration**: {}\n", format_duration(report.duration));

    out.push_str("## Summary\n\n");
    out.push_str("| Metric | Count |\n");
    out.push_str("|--------|-------|\n");
    let _ = writeln!(out, "| Total Sub-tasks | {} |", report.total_sub_tasks);
    let _ = writeln!(out, "| Completed | {} |", report.completed_sub_tasks);
    let _ = writeln!(out, "| Failed | {} |", report.failed_sub_tasks);
    let _ = writeln!(out, "| Skipped | {} |", report.skipped_sub_tasks);
    if report.blocked_sub_tasks > 0 {
        let _ = writeln!(out, "| Blocked | {} |", report.blocked_sub_tasks);
    }
    out.push('\n');

    out.push_str("## Sub-tasks\n\n");
    for (index, sub) in report.sub_task_reports.iter().enumerate() {
        let _ = writeln!(out, "### {}. {}\n", index + 1, sub.description);
        let _ = writeln!(
            out,
            "- **Status**: {} {}",
            status_emoji(sub.status),
            sub.status
        );
        if let Some(ms) = sub.duration.filter(|ms| *ms > 0) {
            let _ = writeln!(out, "- **Duration**: {}", format_duration(ms));
        }
        if let Some(result) = &sub.result {
            let _ = writeln!(
                out,
                "- **Success**: {}",
                if result.success { "✅" } else { "❌" }
            );
            if let Some(v) = &result.verification {
                let verdict = if v.passed { "✅ PASSED" } else { "❌ FAILED" };
                let _ = writeln!(out, "- **Verification**: {verdict}");
            }
            if let Some(changes) = result.git_changes.as_ref() {
                if !changes.files_changed.is_empty() {
                    let _ = writeln!(
                        out,
                        "- **Files Changed**: {}",
                        changes.files_changed.len()
                    );
                    for file in &changes.files_changed {
                        let _ = writeln!(out, "  - {file}");
                    }
                }
            }
        }
        if let Some(err) = &sub.error {
            let _ = writeln!(out, "- **Error**: {err}");
        }
        out.push('\n');
    }

    out
}

fn status_emoji(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Completed => "✅",
        TaskStatus::Failed => "❌",
        TaskStatus::InProgress => "⏳",
        TaskStatus::Skipped => "⏭️",
        TaskStatus::Blocked => "🚫",
        TaskStatus::Pending => "⏸️",
    }
}

/// `1h 2m 3s`, `2m 3s` or `3s`. Sub-second remainders are dropped.
pub fn format_duration(ms: i64) -> String {
    let seconds = ms.max(0) / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes % 60, seconds % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{seconds}s")
    }
}
