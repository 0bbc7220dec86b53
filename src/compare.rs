//! Section-aligned comparison of two changelog documents.
//!
//! Sections are matched by title; shared sections get a line-based LCS diff
//! with contiguous same-kind lines merged into one segment. The tie-break
//! is fixed (removals before additions), so the output is deterministic for
//! identical inputs.

use crate::error::Error;
use crate::section::{self, Section};

/// Classification of a diff segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    /// Lines present only in the right-hand document.
    Added,
    /// Lines present only in the left-hand document.
    Removed,
    /// Lines present in both documents.
    Unchanged,
}

/// A contiguous run of same-kind lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSegment {
    /// Segment classification.
    pub kind: DiffKind,
    /// One or more lines, joined with `\n`.
    pub text: String,
}

/// The diff of one section across the two documents.
#[derive(Debug)]
pub struct SectionDiff {
    /// Ordered diff segments covering the section.
    pub segments: Vec<DiffSegment>,
    /// Section title shared by (or unique to) the two documents.
    pub title: String,
}

/// Compare two changelog documents section by section.
///
/// Iteration order is the left document's sections, then right-only sections
/// appended. A section present on only one side becomes a single whole-body
/// `Added` or `Removed` segment; identical bodies become a single `Unchanged`
/// segment carrying the content for display.
///
/// # Errors
///
/// Returns `Error::EmptyCompareInput` if either document is empty.
pub fn compare(text_a: &str, text_b: &str) -> Result<Vec<SectionDiff>, Error> {
    if text_a.is_empty() {
        return Err(Error::EmptyCompareInput { side: "left" });
    }
    if text_b.is_empty() {
        return Err(Error::EmptyCompareInput { side: "right" });
    }

    let sections_a = section::extract(text_a);
    let sections_b = section::extract(text_b);

    let mut diffs = Vec::new();
    for sec_a in &sections_a {
        let segments = match find_by_title(&sections_b, &sec_a.title) {
            None => vec![DiffSegment {
                kind: DiffKind::Removed,
                text: sec_a.body.clone(),
            }],
            Some(sec_b) if sec_a.body == sec_b.body => vec![DiffSegment {
                kind: DiffKind::Unchanged,
                text: sec_a.body.clone(),
            }],
            Some(sec_b) => diff_lines(&sec_a.body, &sec_b.body),
        };
        diffs.push(SectionDiff {
            segments,
            title: sec_a.title.clone(),
        });
    }

    for sec_b in &sections_b {
        if find_by_title(&sections_a, &sec_b.title).is_none() {
            diffs.push(SectionDiff {
                segments: vec![DiffSegment {
                    kind: DiffKind::Added,
                    text: sec_b.body.clone(),
                }],
                title: sec_b.title.clone(),
            });
        }
    }

    return Ok(diffs);
}

/// Look up a section by title. Titles are unique per document (the extractor
/// merges duplicates).
fn find_by_title<'a>(sections: &'a [Section], title: &str) -> Option<&'a Section> {
    return sections.iter().find(|s| return s.title == title);
}

/// Classic LCS line diff. Builds the suffix LCS-length table, then walks it
/// from the front, preferring removals over additions on ties.
pub fn diff_lines(a: &str, b: &str) -> Vec<DiffSegment> {
    let a_lines: Vec<&str> = a.lines().collect();
    let b_lines: Vec<&str> = b.lines().collect();

    let rows = a_lines.len();
    let cols = b_lines.len();
    let mut table = vec![vec![0_usize; cols.saturating_add(1)]; rows.saturating_add(1)];
    for i in (0..rows).rev() {
        for j in (0..cols).rev() {
            table[i][j] = if a_lines[i] == b_lines[j] {
                table[i + 1][j + 1].saturating_add(1)
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut ops: Vec<(DiffKind, &str)> = Vec::new();
    let mut i = 0_usize;
    let mut j = 0_usize;
    while i < rows && j < cols {
        if a_lines[i] == b_lines[j] {
            ops.push((DiffKind::Unchanged, a_lines[i]));
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            ops.push((DiffKind::Removed, a_lines[i]));
            i += 1;
        } else {
            ops.push((DiffKind::Added, b_lines[j]));
            j += 1;
        }
    }
    while i < rows {
        ops.push((DiffKind::Removed, a_lines[i]));
        i += 1;
    }
    while j < cols {
        ops.push((DiffKind::Added, b_lines[j]));
        j += 1;
    }

    return merge_runs(&ops);
}

/// Merge contiguous same-kind lines into single segments.
fn merge_runs(ops: &[(DiffKind, &str)]) -> Vec<DiffSegment> {
    let mut segments: Vec<DiffSegment> = Vec::new();
    for (kind, line) in ops {
        match segments.last_mut() {
            Some(last) if last.kind == *kind => {
                last.text.push('\n');
                last.text.push_str(line);
            },
            _ => segments.push(DiffSegment {
                kind: *kind,
                text: (*line).to_string(),
            }),
        }
    }
    return segments;
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_a_typed_error() {
        assert!(matches!(
            compare("", "anything"),
            Err(Error::EmptyCompareInput { side: "left" })
        ));
        assert!(matches!(
            compare("anything", ""),
            Err(Error::EmptyCompareInput { side: "right" })
        ));
    }

    #[test]
    fn identical_sections_are_one_unchanged_segment() {
        let text = "## Fixed\n- bug1";
        let diffs = compare(text, text).unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].title, "Fixed");
        assert_eq!(
            diffs[0].segments,
            vec![DiffSegment {
                kind: DiffKind::Unchanged,
                text: text.to_string(),
            }]
        );
    }

    #[test]
    fn added_line_in_shared_section() {
        let a = "## Fixed\n- bug1";
        let b = "## Fixed\n- bug1\n- bug2";
        let diffs = compare(a, b).unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(
            diffs[0].segments,
            vec![
                DiffSegment {
                    kind: DiffKind::Unchanged,
                    text: "## Fixed\n- bug1".to_string(),
                },
                DiffSegment {
                    kind: DiffKind::Added,
                    text: "- bug2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn one_sided_sections_become_whole_body_segments() {
        let a = "## Fixed\n- bug1\n## Removed\n- old api";
        let b = "## Fixed\n- bug1\n## Added\n- new api";
        let diffs = compare(a, b).unwrap();

        let titles: Vec<&str> = diffs.iter().map(|d| return d.title.as_str()).collect();
        assert_eq!(titles, vec!["Fixed", "Removed", "Added"]);

        assert_eq!(diffs[1].segments.len(), 1);
        assert_eq!(diffs[1].segments[0].kind, DiffKind::Removed);
        assert_eq!(diffs[2].segments.len(), 1);
        assert_eq!(diffs[2].segments[0].kind, DiffKind::Added);
        assert_eq!(diffs[2].segments[0].text, "## Added\n- new api");
    }

    #[test]
    fn contiguous_changes_merge_into_one_segment() {
        let segments = diff_lines("a\nx\ny\nb", "a\nu\nv\nb");
        assert_eq!(
            segments,
            vec![
                DiffSegment { kind: DiffKind::Unchanged, text: "a".to_string() },
                DiffSegment { kind: DiffKind::Removed, text: "x\ny".to_string() },
                DiffSegment { kind: DiffKind::Added, text: "u\nv".to_string() },
                DiffSegment { kind: DiffKind::Unchanged, text: "b".to_string() },
            ]
        );
    }

    #[test]
    fn diff_is_deterministic() {
        let first = diff_lines("a\nb\nc", "c\na\nb");
        let second = diff_lines("a\nb\nc", "c\na\nb");
        assert_eq!(first, second);
    }
}
