//! Heading-delimited section extraction from changelog markdown.

/// Title used for content appearing before the first heading.
pub const GENERAL_TITLE: &str = "General";

/// A heading-delimited block of a changelog document. The body includes the
/// heading line itself. Recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Lines of the section, heading included, joined with `\n`.
    pub body: String,
    /// Heading text with the marker stripped and trimmed.
    pub title: String,
}

/// Split a changelog document into sections at level-1 and level-2 headings.
/// Level-3 and deeper headings stay inside the enclosing section.
///
/// Content before the first heading is collected under `"General"`. An empty
/// document yields an empty sequence. Duplicate titles are merged by
/// concatenating bodies in order of first appearance — the sections of a
/// document always have unique titles.
///
/// Concatenating all bodies in order reconstructs the document, modulo a
/// trailing newline and modulo duplicate-title merging.
pub fn extract(text: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut current_title = GENERAL_TITLE.to_string();
    let mut current_lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        match heading_title(line) {
            None => current_lines.push(line),
            Some(title) => {
                flush(&mut sections, &current_title, &current_lines);
                current_title = title.to_string();
                current_lines = vec![line];
            },
        }
    }
    flush(&mut sections, &current_title, &current_lines);

    return sections;
}

/// The title of a level-1 or level-2 heading line, or `None` for any other
/// line (including level-3+ headings).
fn heading_title(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix("## ") {
        return Some(rest.trim());
    }
    if let Some(rest) = line.strip_prefix("# ") {
        return Some(rest.trim());
    }
    return None;
}

/// Append the accumulated lines as a section, merging into an existing
/// section when the title repeats.
fn flush(sections: &mut Vec<Section>, title: &str, lines: &[&str]) {
    if lines.is_empty() {
        return;
    }
    let body = lines.join("\n");

    if let Some(existing) = sections.iter_mut().find(|s| return s.title == title) {
        existing.body.push('\n');
        existing.body.push_str(&body);
        return;
    }

    sections.push(Section {
        body,
        title: title.to_string(),
    });
    return;
}
