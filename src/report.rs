//! Terminal rendering of search results, diffs, and statistics.
//!
//! Pure string builders: nothing here touches the filesystem or the session,
//! so every renderer is testable on its own.

use std::fmt::Write as _;

use crate::compare::{DiffKind, SectionDiff};
use crate::search::VersionMatches;
use crate::stats::StatsReport;
use crate::version::VersionId;

const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Render multi-version search results, one block per version.
pub fn render_search_results(results: &[VersionMatches], term: &str) -> String {
    if results.is_empty() {
        return format!("No matches for \"{term}\".\n");
    }

    let total: usize = results.iter().map(|r| return r.total_occurrences).sum();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{total} occurrences of \"{term}\" across {} versions\n",
        results.len()
    );

    for result in results {
        let display = VersionId::parse(&result.version).display_name();
        let _ = writeln!(
            out,
            "{BOLD}{display}{RESET}  ({} matching lines, {} occurrences)",
            result.matches.len(),
            result.total_occurrences
        );
        for m in &result.matches {
            let _ = writeln!(out, "  {:>4}: {}", m.line, m.text.trim_end());
        }
        out.push('\n');
    }
    return out;
}

/// Render a section-aligned diff with colored `+`/`-` line markers.
pub fn render_diff(diffs: &[SectionDiff], name_a: &str, name_b: &str) -> String {
    let mut out = format!("Comparing {name_a} with {name_b}\n\n");

    for diff in diffs {
        let _ = writeln!(out, "{BOLD}== {} =={RESET}", diff.title);

        let unchanged_only = diff
            .segments
            .iter()
            .all(|seg| return seg.kind == DiffKind::Unchanged);
        if unchanged_only {
            out.push_str("(no differences)\n\n");
            continue;
        }

        for segment in &diff.segments {
            let (marker, color) = match segment.kind {
                DiffKind::Added => ("+", GREEN),
                DiffKind::Removed => ("-", RED),
                DiffKind::Unchanged => (" ", ""),
            };
            let reset = if color.is_empty() { "" } else { RESET };
            for line in segment.text.lines() {
                let _ = writeln!(out, "{color}{marker} {line}{reset}");
            }
        }
        out.push('\n');
    }
    return out;
}

/// Render the statistics report as readable markdown.
pub fn render_stats(report: &StatsReport) -> String {
    let mut out = String::from("# Changelog statistics\n\n## Releases by major version\n\n");
    for (major, count) in &report.releases_by_major {
        let _ = writeln!(out, "- {major}.x: {count} releases");
    }

    out.push_str("\n## Release timeline\n\n");
    if report.timeline.is_empty() {
        out.push_str("No release dates could be extracted.\n");
    } else {
        for point in &report.timeline {
            let _ = writeln!(
                out,
                "- {}  {} ({} changes)",
                point.date, point.version, point.changes
            );
        }
    }

    out.push_str("\n## Changes by category\n\n");
    for (category, count) in &report.changes_by_category {
        let _ = writeln!(out, "- {category}: {count}");
    }

    let kinds = &report.change_kinds;
    out.push_str("\n## Change types (heuristic)\n\n");
    let _ = writeln!(out, "- Added/New: {}", kinds.added);
    let _ = writeln!(out, "- Fixed/Bugs: {}", kinds.fixed);
    let _ = writeln!(out, "- Removed/Deprecated: {}", kinds.removed);
    let _ = writeln!(out, "- Changed/Updated: {}", kinds.changed);
    let _ = writeln!(out, "- Other: {}", kinds.other);

    out.push_str("\n## Versions\n\n");
    for stats in &report.versions {
        let date = stats.release_date.as_deref().unwrap_or("unknown");
        let categories = stats
            .top_categories
            .iter()
            .map(|(name, count)| return format!("{name} ({count})"))
            .collect::<Vec<_>>()
            .join(", ");
        let categories = if categories.is_empty() {
            "none".to_string()
        } else {
            categories
        };
        let _ = writeln!(
            out,
            "- {}  released {date}, {} changes, top: {categories}",
            stats.version, stats.changes
        );
    }
    return out;
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::compare;
    use crate::search::{SearchOptions, search_versions};
    use crate::session::tests::session_with;
    use crate::stats;

    #[test]
    fn empty_results_render_a_no_match_line() {
        let rendered = render_search_results(&[], "creeper");
        assert_eq!(rendered, "No matches for \"creeper\".\n");
    }

    #[test]
    fn search_results_show_line_numbers() {
        let mut session = session_with(&[("5.1.md", "## Fixed\n- fixed chunk loss")]);
        let files = session.versions().to_vec();
        let results = search_versions(&mut session, &files, "fixed", &SearchOptions::default());
        let rendered = render_search_results(&results, "fixed");
        assert!(rendered.contains("5.1"));
        assert!(rendered.contains("   1: ## Fixed"));
        assert!(rendered.contains("   2: - fixed chunk loss"));
    }

    #[test]
    fn identical_sections_render_no_differences() {
        let diffs = compare::compare("## Fixed\n- bug", "## Fixed\n- bug").unwrap();
        let rendered = render_diff(&diffs, "5.0", "5.1");
        assert!(rendered.contains("== Fixed =="));
        assert!(rendered.contains("(no differences)"));
    }

    #[test]
    fn diff_lines_carry_markers() {
        let diffs = compare::compare("## Fixed\n- bug1", "## Fixed\n- bug1\n- bug2").unwrap();
        let rendered = render_diff(&diffs, "5.0", "5.1");
        assert!(rendered.contains("  ## Fixed"));
        assert!(rendered.contains("+ - bug2"));
    }

    #[test]
    fn stats_render_every_block() {
        let mut session = session_with(&[(
            "5.0.md",
            "# 5.0\nReleased 2024-03-01.\n## Fixed\n- Fixed a crash",
        )]);
        let report = stats::analyze(&mut session);
        let rendered = render_stats(&report);
        assert!(rendered.contains("## Releases by major version"));
        assert!(rendered.contains("- 5.x: 1 releases"));
        assert!(rendered.contains("- 2024-03-01  5.0 (1 changes)"));
        assert!(rendered.contains("- Fixed: 1"));
        assert!(rendered.contains("released 2024-03-01, 1 changes, top: Fixed (1)"));
    }
}
