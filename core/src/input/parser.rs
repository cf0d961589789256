//! Step extraction
//!
//! Turns free text into an ordered list of steps using structural cues only:
//! bullet markers (`-`, `*`, `•`) and numbered markers (`1.`). Lines without
//! a marker are steps in their own right. Textual order implies a sequential
//! dependency on the previous step.

use lazy_static::lazy_static;
use regex::Regex;

use crate::task::SubTask;

lazy_static! {
    static ref BULLET_RE: Regex = Regex::new(r"^[-*•]\s+(.+)$").expect("BULLET_RE is valid");
    static ref NUMBERED_RE: Regex = Regex::new(r"^\d+\.\s+(.+)$").expect("NUMBERED_RE is valid");
    static ref SEQUENCING_CUE_RE: Regex =
        Regex::new(r"(?i)\b(after|once|then|following)\b").expect("SEQUENCING_CUE_RE is valid");
}

/// One extracted step, before it becomes a [`SubTask`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub description: String,
    pub dependencies: Vec<String>,
    /// The line carried a marker (bullet or numeral)
    pub marked: bool,
    /// The description mentions "after", "once", "then" or "following"
    pub sequencing_cue: bool,
}

/// Positional sub-task id; dependency references rely on this exact shape.
pub fn step_id(position: usize) -> String {
    format!("task-{position}")
}

fn strip_marker(line: &str) -> Option<&str> {
    BULLET_RE
        .captures(line)
        .or_else(|| NUMBERED_RE.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub struct InputParser;

impl InputParser {
    /// Extract ordered steps from `text`.
    pub fn extract(text: &str) -> Vec<Step> {
        let mut steps: Vec<Step> = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let (description, marked) = match strip_marker(trimmed) {
                Some(rest) => (rest.trim().to_string(), true),
                None => (trimmed.to_string(), false),
            };

            let sequencing_cue = SEQUENCING_CUE_RE.is_match(&description);
            // Every step after the first waits for its predecessor; a cue
            // word points at the same edge.
            let dependencies = if steps.is_empty() {
                Vec::new()
            } else {
                vec![step_id(steps.len())]
            };

            steps.push(Step {
                description,
                dependencies,
                marked,
                sequencing_cue,
            });
        }

        if steps.is_empty() {
            steps.push(Step {
                description: text.split_whitespace().collect::<Vec<_>>().join(" "),
                dependencies: Vec::new(),
                marked: false,
                sequencing_cue: false,
            });
        }

        steps
    }

    /// Extract steps and turn them into PENDING sub-tasks with ids `task-1..task-N`.
    pub fn decompose(text: &str) -> Vec<SubTask> {
        Self::extract(text)
            .into_iter()
            .enumerate()
            .map(|(idx, step)| {
                tracing::debug!(
                    step = idx + 1,
                    marked = step.marked,
                    cue = step.sequencing_cue,
                    "extracted: {}",
                    step.description
                );
                SubTask::new(step_id(idx + 1), step.description)
                    .with_dependencies(step.dependencies)
            })
            .collect()
    }
}
