//! `//lint:ignore retnonnilerr` directives.
//!
//! A directive suppresses the statement on the line after the comment.

use std::collections::{HashMap, HashSet};

use retnonnilerr_ir::ir::FileInfo;

/// Default directive text. Matched as a substring of the comment.
pub const IGNORE_MARKER: &str = "lint:ignore retnonnilerr";

/// File path → lines whose statement carries an ignore directive.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SuppressionIndex {
    lines: HashMap<String, HashSet<u32>>,
}

impl SuppressionIndex {
    /// Scan every comment of `files`. An empty `marker` disables suppression.
    pub fn build(files: &[FileInfo], marker: &str) -> Self {
        let mut lines: HashMap<String, HashSet<u32>> = HashMap::new();
        if marker.is_empty() {
            return Self { lines };
        }
        for file in files {
            for comment in &file.comments {
                if !comment.text.contains(marker) {
                    continue;
                }
                let path = if comment.span.file.is_empty() {
                    &file.path
                } else {
                    &comment.span.file
                };
                lines
                    .entry(path.clone())
                    .or_default()
                    .insert(comment.span.start_line + 1);
            }
        }
        Self { lines }
    }

    pub fn is_suppressed(&self, file: &str, line: u32) -> bool {
        self.lines.get(file).is_some_and(|set| set.contains(&line))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.values().all(|set| set.is_empty())
    }

    /// Number of suppressed lines across all files.
    pub fn len(&self) -> usize {
        self.lines.values().map(|set| set.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retnonnilerr_ir::ir::{Comment, Span};

    fn comment(file: &str, line: u32, text: &str) -> Comment {
        Comment {
            text: text.into(),
            span: Span::new(file, line, 3),
        }
    }

    fn file(path: &str, comments: Vec<Comment>) -> FileInfo {
        FileInfo {
            path: path.into(),
            package_name: "a".into(),
            is_generated: false,
            comments,
        }
    }

    #[test]
    fn test_marker_suppresses_next_line() {
        let files = vec![file(
            "a/c.go",
            vec![
                comment("a/c.go", 14, "//lint:ignore retnonnilerr ignore"),
                comment("a/c.go", 20, "// plain comment"),
            ],
        )];
        let index = SuppressionIndex::build(&files, IGNORE_MARKER);
        assert!(index.is_suppressed("a/c.go", 15));
        assert!(!index.is_suppressed("a/c.go", 14));
        assert!(!index.is_suppressed("a/c.go", 21));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_substring_match_anywhere_in_comment() {
        let files = vec![file(
            "a.go",
            vec![
                comment("a.go", 3, "/* lint:ignore retnonnilerr legacy API */"),
                comment("a.go", 9, "// TODO lint:ignore retnonnilerr"),
            ],
        )];
        let index = SuppressionIndex::build(&files, IGNORE_MARKER);
        assert!(index.is_suppressed("a.go", 4));
        assert!(index.is_suppressed("a.go", 10));
    }

    #[test]
    fn test_keyed_by_file() {
        let files = vec![
            file("a.go", vec![comment("a.go", 5, "//lint:ignore retnonnilerr")]),
            file("b.go", vec![]),
        ];
        let index = SuppressionIndex::build(&files, IGNORE_MARKER);
        assert!(index.is_suppressed("a.go", 6));
        assert!(!index.is_suppressed("b.go", 6));
    }

    #[test]
    fn test_comment_without_file_uses_file_path() {
        let files = vec![file("a.go", vec![comment("", 5, "//lint:ignore retnonnilerr")])];
        let index = SuppressionIndex::build(&files, IGNORE_MARKER);
        assert!(index.is_suppressed("a.go", 6));
    }

    #[test]
    fn test_other_checks_markers_do_not_match() {
        let files = vec![file(
            "a.go",
            vec![comment("a.go", 5, "//lint:ignore SA4006 unused")],
        )];
        let index = SuppressionIndex::build(&files, IGNORE_MARKER);
        assert!(index.is_empty());
    }

    #[test]
    fn test_empty_marker_and_empty_input() {
        let files = vec![file("a.go", vec![comment("a.go", 5, "// anything")])];
        assert!(SuppressionIndex::build(&files, "").is_empty());
        assert!(SuppressionIndex::build(&[], IGNORE_MARKER).is_empty());
    }

    #[test]
    fn test_custom_marker() {
        let files = vec![file("a.go", vec![comment("a.go", 5, "//nolint:retnonnilerr")])];
        let index = SuppressionIndex::build(&files, "nolint:retnonnilerr");
        assert!(index.is_suppressed("a.go", 6));
    }
}
