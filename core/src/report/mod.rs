//! Run reports: the read-only model computed at run end, its text, JSON and
//! Markdown renderings, and persistence of the rendered output.

mod model;
mod render;

use std::path::Path;

use anyhow::Context;

pub use model::{SubTaskReport, TaskReport};
pub use render::{format_duration, format_json, format_markdown, format_text, render};

/// Write exactly the rendered report to `path`, creating parent directories.
pub fn persist(content: &str, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write report to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persist_writes_content_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("run.md");
        persist("# Task Execution Report\n", &path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "# Task Execution Report\n"
        );
    }
}
