/// One line of `git status --porcelain` (v1) output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Two-letter XY code, e.g. `" M"`, `"A "`, `"??"`
    pub code: String,
    pub path: String,
}

/// Parse porcelain v1 output. Renames report the new path; ignored entries
/// are dropped.
pub fn parse_porcelain(output: &str) -> Vec<StatusEntry> {
    output
        .lines()
        .filter(|line| line.len() > 3)
        .filter_map(|line| {
            let (code, rest) = line.split_at(2);
            if code == "!!" {
                return None;
            }
            let path = rest.trim_start();
            let path = path.rsplit_once(" -> ").map_or(path, |(_, new)| new);
            Some(StatusEntry {
                code: code.to_string(),
                path: unquote(path).to_string(),
            })
        })
        .collect()
}

fn unquote(path: &str) -> &str {
    path.strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_modified_added_deleted_and_untracked() {
        let out = " M src/lib.rs\nA  new.rs\n D gone.rs\n?? notes.txt\n!! target/\n";
        let entries = parse_porcelain(out);
        let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["src/lib.rs", "new.rs", "gone.rs", "notes.txt"]);
        assert_eq!(entries[2].code, " D");
        assert_eq!(entries[3].code, "??");
    }

    #[test]
    fn renames_report_the_destination() {
        let entries = parse_porcelain("R  old name.rs -> \"new name.rs\"\n");
        assert_eq!(entries[0].path, "new name.rs");
    }

    #[test]
    fn empty_output_means_clean_tree() {
        assert!(parse_porcelain("").is_empty());
        assert!(parse_porcelain("\n").is_empty());
    }
}
