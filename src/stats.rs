//! Archive-wide statistics: release counts, timeline, and change breakdowns.
//!
//! Release dates and change types are recovered by best-effort pattern
//! matching over prose — the classification is heuristic and approximate by
//! design, not exact. A document with no parseable date or no sections is
//! skipped where needed, never a failure.

use std::collections::BTreeMap;

use regex::Regex;

use crate::section;
use crate::session::Session;
use crate::version::VersionId;

/// Heuristic classification of a change line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Mentions add / new / support.
    Added,
    /// Mentions chang / updat / improv.
    Changed,
    /// Mentions fix / bug.
    Fixed,
    /// No recognized keyword.
    Other,
    /// Mentions remov / deprecat.
    Removed,
}

/// Counts of change lines per heuristic kind.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChangeKindCounts {
    /// Lines classified `Added`.
    pub added: u32,
    /// Lines classified `Changed`.
    pub changed: u32,
    /// Lines classified `Fixed`.
    pub fixed: u32,
    /// Lines classified `Other`.
    pub other: u32,
    /// Lines classified `Removed`.
    pub removed: u32,
}

impl ChangeKindCounts {
    /// Bump the counter for one kind.
    fn record(&mut self, kind: ChangeKind) {
        let counter = match kind {
            ChangeKind::Added => &mut self.added,
            ChangeKind::Changed => &mut self.changed,
            ChangeKind::Fixed => &mut self.fixed,
            ChangeKind::Other => &mut self.other,
            ChangeKind::Removed => &mut self.removed,
        };
        *counter = counter.saturating_add(1);
        return;
    }
}

/// One release on the chronological timeline.
#[derive(Debug)]
pub struct TimelinePoint {
    /// Total change lines in the release.
    pub changes: u32,
    /// The raw extracted date string, as written in the changelog.
    pub date: String,
    /// Parsed (year, month, day) used for chronological ordering.
    pub sort_key: (i32, u32, u32),
    /// Display name of the release.
    pub version: String,
}

/// Per-version summary row for the statistics table.
#[derive(Debug)]
pub struct VersionStats {
    /// Total change lines across all sections.
    pub changes: u32,
    /// Changelog file name.
    pub file: String,
    /// Extracted release date, if any.
    pub release_date: Option<String>,
    /// Top categories by change count, largest first (at most three).
    pub top_categories: Vec<(String, u32)>,
    /// Display name of the release.
    pub version: String,
}

/// The full aggregated report over all fetchable versions.
#[derive(Debug)]
pub struct StatsReport {
    /// Change lines per section title, largest count first.
    pub changes_by_category: Vec<(String, u32)>,
    /// Heuristic change-type counts.
    pub change_kinds: ChangeKindCounts,
    /// Release counts keyed by major version.
    pub releases_by_major: BTreeMap<u32, u32>,
    /// Releases with a parseable date, oldest first.
    pub timeline: Vec<TimelinePoint>,
    /// Per-version rows, newest version first.
    pub versions: Vec<VersionStats>,
}

/// Aggregate statistics over every version the session knows about.
/// Versions whose content cannot be fetched are skipped — one bad file never
/// aborts the aggregation.
///
/// # Panics
///
/// Panics if the hardcoded date regexes are invalid (compile-time invariant).
pub fn analyze(session: &mut Session) -> StatsReport {
    let date_patterns = DatePatterns::new();

    let mut releases_by_major: BTreeMap<u32, u32> = BTreeMap::new();
    let mut category_totals: BTreeMap<String, u32> = BTreeMap::new();
    let mut change_kinds = ChangeKindCounts::default();
    let mut timeline = Vec::new();
    let mut versions = Vec::new();

    let files = session.versions().to_vec();
    for file in &files {
        let Some(content) = session.try_content(file) else {
            continue;
        };
        let content = content.to_string();
        let parsed = VersionId::parse(file);

        let major_count = releases_by_major.entry(parsed.major).or_insert(0);
        *major_count = major_count.saturating_add(1);

        let release_date = date_patterns.extract(&content);

        let mut total_changes = 0_u32;
        let mut categories: Vec<(String, u32)> = Vec::new();
        for sec in section::extract(&content) {
            if sec.title == section::GENERAL_TITLE {
                continue;
            }
            let change_lines: Vec<&str> = sec
                .body
                .lines()
                .filter(|line| return line.trim_start().starts_with('-'))
                .collect();
            let count = u32::try_from(change_lines.len()).unwrap_or(u32::MAX);
            total_changes = total_changes.saturating_add(count);

            if count > 0 {
                let category_total = category_totals.entry(sec.title.clone()).or_insert(0);
                *category_total = category_total.saturating_add(count);
                categories.push((sec.title.clone(), count));
            }

            for line in change_lines {
                change_kinds.record(classify_change_line(line));
            }
        }

        categories.sort_by(|a, b| return b.1.cmp(&a.1).then_with(|| return a.0.cmp(&b.0)));
        categories.truncate(3);

        if let Some(date) = &release_date
            && let Some(sort_key) = parse_date(date)
        {
            timeline.push(TimelinePoint {
                changes: total_changes,
                date: date.clone(),
                sort_key,
                version: parsed.display_name(),
            });
        }

        versions.push(VersionStats {
            changes: total_changes,
            file: file.clone(),
            release_date,
            top_categories: categories,
            version: parsed.display_name(),
        });
    }

    timeline.sort_by_key(|point| return point.sort_key);
    versions.sort_by_key(|stats| return VersionId::parse(&stats.file));

    let mut changes_by_category: Vec<(String, u32)> = category_totals.into_iter().collect();
    changes_by_category.sort_by(|a, b| return b.1.cmp(&a.1).then_with(|| return a.0.cmp(&b.0)));

    return StatsReport {
        changes_by_category,
        change_kinds,
        releases_by_major,
        timeline,
        versions,
    };
}

/// Classify one change line by keyword sniffing. Approximate by design.
pub fn classify_change_line(line: &str) -> ChangeKind {
    let lowered = line.to_lowercase();
    if lowered.contains("add") || lowered.contains("new") || lowered.contains("support") {
        return ChangeKind::Added;
    }
    if lowered.contains("fix") || lowered.contains("bug") {
        return ChangeKind::Fixed;
    }
    if lowered.contains("remov") || lowered.contains("deprecat") {
        return ChangeKind::Removed;
    }
    if lowered.contains("chang") || lowered.contains("updat") || lowered.contains("improv") {
        return ChangeKind::Changed;
    }
    return ChangeKind::Other;
}

/// The three release-date patterns, tried most-specific first.
struct DatePatterns {
    iso: Regex,
    long_form: Regex,
    loose: Regex,
}

impl DatePatterns {
    /// Compile the patterns once per aggregation run.
    ///
    /// # Panics
    ///
    /// Panics if a hardcoded regex is invalid (compile-time invariant).
    fn new() -> Self {
        return Self {
            iso: Regex::new(r"(?i)Released\s+(\d{4}-\d{2}-\d{2})").expect("valid regex"),
            long_form: Regex::new(r"(?i)Released\s+(\d+(?:st|nd|rd|th)?\s+\w+\s+\d{4})")
                .expect("valid regex"),
            loose: Regex::new(
                r"(?i)Released[^.]*?(\d{1,2}[\s/-]\w+[\s/-]\d{4}|\d{4}[\s/-]\d{1,2}[\s/-]\d{1,2})",
            )
            .expect("valid regex"),
        };
    }

    /// Extract the first release date mentioned near the word "Released".
    fn extract(&self, content: &str) -> Option<String> {
        for pattern in [&self.long_form, &self.iso, &self.loose] {
            if let Some(cap) = pattern.captures(content)
                && let Some(date) = cap.get(1)
            {
                return Some(date.as_str().to_string());
            }
        }
        return None;
    }
}

/// English month names for long-form date parsing, index = month - 1.
const MONTH_NAMES: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

/// Best-effort parse of an extracted date string into (year, month, day).
/// Handles ISO `yyyy-mm-dd` and long forms like `12th December 2021`.
/// Returns `None` when no ordering key can be recovered.
pub fn parse_date(raw: &str) -> Option<(i32, u32, u32)> {
    let trimmed = raw.trim();

    // ISO form first.
    let iso_parts: Vec<&str> = trimmed.split('-').collect();
    if iso_parts.len() == 3
        && let (Ok(year), Ok(month), Ok(day)) = (
            iso_parts[0].parse::<i32>(),
            iso_parts[1].parse::<u32>(),
            iso_parts[2].parse::<u32>(),
        )
    {
        return Some((year, month, day));
    }

    // Long form: find a month name, a 4-digit year, and a day number.
    let parts: Vec<&str> = trimmed
        .split(|c: char| return c.is_whitespace() || c == '/' || c == '-')
        .filter(|part| return !part.is_empty())
        .collect();

    let mut year = None;
    let mut month = None;
    let mut day = None;
    for part in &parts {
        let lowered = part.to_lowercase();
        if let Some(idx) = MONTH_NAMES.iter().position(|m| return lowered.contains(m)) {
            month = Some(u32::try_from(idx).unwrap_or(0).saturating_add(1));
            continue;
        }
        if part.len() == 4
            && let Ok(y) = part.parse::<i32>()
        {
            year = Some(y);
            continue;
        }
        let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
        if day.is_none()
            && let Ok(d) = digits.parse::<u32>()
        {
            day = Some(d);
        }
    }

    return match (year, month) {
        (Some(y), Some(m)) => Some((y, m, day.unwrap_or(1))),
        _ => None,
    };
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::session::tests::session_with;

    #[test]
    fn extracts_long_form_release_date() {
        let patterns = DatePatterns::new();
        let content = "# 4.12\nReleased 14th December 2021.\n## Fixed\n- bug";
        assert_eq!(patterns.extract(content), Some("14th December 2021".to_string()));
    }

    #[test]
    fn extracts_iso_release_date() {
        let patterns = DatePatterns::new();
        assert_eq!(
            patterns.extract("Released 2023-05-01 to the public"),
            Some("2023-05-01".to_string())
        );
    }

    #[test]
    fn missing_date_is_none() {
        let patterns = DatePatterns::new();
        assert_eq!(patterns.extract("## Fixed\n- bug"), None);
    }

    #[test]
    fn parses_dates_into_sortable_keys() {
        assert_eq!(parse_date("2023-05-01"), Some((2023, 5, 1)));
        assert_eq!(parse_date("14th December 2021"), Some((2021, 12, 14)));
        assert_eq!(parse_date("nonsense"), None);
    }

    #[test]
    fn classifies_change_lines_by_keyword() {
        assert_eq!(classify_change_line("- Added new mob"), ChangeKind::Added);
        assert_eq!(classify_change_line("- Fixed crash on join"), ChangeKind::Fixed);
        assert_eq!(classify_change_line("- Removed legacy API"), ChangeKind::Removed);
        assert_eq!(classify_change_line("- Improved chunk loading"), ChangeKind::Changed);
        assert_eq!(classify_change_line("- Misc tweaks"), ChangeKind::Other);
    }

    #[test]
    fn aggregates_across_versions_and_skips_failures() {
        let mut session = session_with(&[
            (
                "5.1.md",
                "# 5.1\nReleased 2024-03-01.\n## Fixed\n- Fixed a crash\n## Added\n- Added a mob",
            ),
            ("5.0.md", "# 5.0\n## Fixed\n- Fixed fall damage"),
            ("4.9.md", "# 4.9\nReleased 1st June 2023.\n## Added\n- Added blocks"),
        ]);

        let report = analyze(&mut session);

        assert_eq!(report.releases_by_major[&5], 2);
        assert_eq!(report.releases_by_major[&4], 1);

        // 5.0 has no parseable date and is absent from the timeline, but
        // still present in the per-version rows.
        assert_eq!(report.timeline.len(), 2);
        assert_eq!(report.timeline[0].version, "4.9");
        assert_eq!(report.versions.len(), 3);
        assert_eq!(report.versions[0].version, "5.1");

        assert_eq!(report.change_kinds.fixed, 2);
        assert_eq!(report.change_kinds.added, 2);
        assert_eq!(report.changes_by_category[0], ("Added".to_string(), 2));
    }

    #[test]
    fn general_section_is_excluded_from_change_counts() {
        let mut session = session_with(&[("5.0.md", "- preamble note\n# 5.0\n- a change entry")]);
        let report = analyze(&mut session);
        // The pre-heading "General" block is skipped; the titled section counts.
        assert_eq!(report.versions[0].changes, 1);
    }
}
