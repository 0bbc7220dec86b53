//! Full-text search across changelog documents.
//!
//! Three query forms: plain substring terms, quoted phrases, and boolean
//! queries using the `AND` / `OR` / `NOT` keywords. Boolean queries use a
//! simple sequential operator walk, with no parentheses and no precedence.

use regex::Regex;

use crate::session::Session;

/// Options controlling how a query is matched.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Match without case folding.
    pub case_sensitive: bool,
    /// Restrict matching to markdown heading lines (`#` through `######`),
    /// against the heading text only.
    pub headings_only: bool,
}

/// One matching line within a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// 1-based line number of the match.
    pub line: usize,
    /// Number of non-overlapping occurrences of the term within the line.
    /// Always 1 for boolean queries, which match lines rather than terms.
    pub occurrences: usize,
    /// The full text of the matching line.
    pub text: String,
}

/// All matches for one version, produced by a multi-version search.
#[derive(Debug)]
pub struct VersionMatches {
    /// Matching lines in ascending line order.
    pub matches: Vec<SearchMatch>,
    /// Sum of `occurrences` across all matches.
    pub total_occurrences: usize,
    /// Changelog file name the matches belong to.
    pub version: String,
}

/// Search one document for a query. Returns one match per matching line,
/// in ascending line order. An empty result is a valid outcome, not an error.
pub fn search(content: &str, query: &str, options: &SearchOptions) -> Vec<SearchMatch> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let candidates = candidate_lines(content, options.headings_only);

    if is_boolean_query(query) {
        return boolean_search(&candidates, query, options.case_sensitive);
    }

    let term = unquote(query);
    let folded_term = fold(term, options.case_sensitive);

    let mut matches = Vec::new();
    for candidate in &candidates {
        let haystack = fold(&candidate.searchable, options.case_sensitive);
        let occurrences = count_occurrences(&haystack, &folded_term);
        if occurrences > 0 {
            matches.push(SearchMatch {
                line: candidate.line,
                occurrences,
                text: candidate.text.clone(),
            });
        }
    }
    return matches;
}

/// Search a list of versions, reusing the session cache and fetching missing
/// content through the session source. Versions whose content cannot be
/// fetched are skipped — one bad file never aborts the batch. Only versions
/// with at least one match appear in the result.
pub fn search_versions(
    session: &mut Session,
    files: &[String],
    query: &str,
    options: &SearchOptions,
) -> Vec<VersionMatches> {
    let mut results = Vec::new();
    for file in files {
        let Some(content) = session.try_content(file) else {
            continue;
        };
        let matches = search(content, query, options);
        if matches.is_empty() {
            continue;
        }
        let total_occurrences = matches.iter().map(|m| return m.occurrences).sum();
        results.push(VersionMatches {
            matches,
            total_occurrences,
            version: file.clone(),
        });
    }
    return results;
}

/// A line eligible for matching: its 1-based number, its full text, and the
/// portion of it the query is matched against.
struct Candidate {
    line: usize,
    searchable: String,
    text: String,
}

/// Every line of the document, or only heading lines with the marker
/// stripped when `headings_only` is set.
fn candidate_lines(content: &str, headings_only: bool) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let searchable = if headings_only {
            let Some(heading) = heading_text(line) else {
                continue;
            };
            heading.to_string()
        } else {
            line.to_string()
        };
        candidates.push(Candidate {
            line: idx.saturating_add(1),
            searchable,
            text: line.to_string(),
        });
    }
    return candidates;
}

/// The text of a markdown heading (`#` through `######`), or `None`.
fn heading_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start_matches('#');
    let depth = line.len().saturating_sub(trimmed.len());
    if depth == 0 || depth > 6 {
        return None;
    }
    return trimmed.strip_prefix(' ').map(str::trim);
}

/// Whether the query uses the boolean operator keywords. Keyword detection
/// is case-sensitive: `player and fixed` is a plain term, not a boolean query.
fn is_boolean_query(query: &str) -> bool {
    return query.contains(" AND ") || query.contains(" OR ") || query.contains(" NOT ");
}

/// Strip surrounding quotes from an exact-phrase query.
fn unquote(term: &str) -> &str {
    if term.len() >= 2 && term.starts_with('"') && term.ends_with('"') {
        return &term[1..term.len().saturating_sub(1)];
    }
    return term;
}

/// Lowercase unless the search is case-sensitive.
fn fold(text: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        return text.to_string();
    }
    return text.to_lowercase();
}

/// Count non-overlapping occurrences of a term, advancing by the term
/// length after each hit.
fn count_occurrences(text: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }
    let mut count = 0_usize;
    let mut position = 0_usize;
    while let Some(found) = text.get(position..).and_then(|rest| return rest.find(term)) {
        count = count.saturating_add(1);
        position = position.saturating_add(found).saturating_add(term.len());
    }
    return count;
}

/// Evaluate a boolean query against each candidate line with the sequential
/// operator walk: the first term must match, `NOT` negates the next term,
/// `AND` requires the next term, `OR` clears the requirement.
fn boolean_search(
    candidates: &[Candidate],
    query: &str,
    case_sensitive: bool,
) -> Vec<SearchMatch> {
    let tokens = tokenize(query);

    let mut matches = Vec::new();
    for candidate in candidates {
        let haystack = fold(&candidate.searchable, case_sensitive);
        if line_satisfies(&haystack, &tokens, case_sensitive) {
            matches.push(SearchMatch {
                line: candidate.line,
                occurrences: 1,
                text: candidate.text.clone(),
            });
        }
    }
    return matches;
}

/// Split a query into terms, keeping quoted phrases as single tokens.
///
/// # Panics
///
/// Panics if the hardcoded token regex is invalid (compile-time invariant).
fn tokenize(query: &str) -> Vec<String> {
    let pattern = Regex::new(r#"[^\s"]+|"[^"]*""#).expect("valid regex");
    return pattern
        .find_iter(query)
        .map(|m| return m.as_str().to_string())
        .collect();
}

/// The sequential operator walk over one line.
fn line_satisfies(haystack: &str, tokens: &[String], case_sensitive: bool) -> bool {
    let mut require_next = false;
    let mut exclude_next = false;

    for (idx, token) in tokens.iter().enumerate() {
        match token.as_str() {
            "AND" => {
                require_next = true;
                continue;
            },
            "OR" => {
                require_next = false;
                continue;
            },
            "NOT" => {
                exclude_next = true;
                continue;
            },
            _ => {},
        }

        let term = fold(unquote(token), case_sensitive);
        let found = haystack.contains(&term);

        if exclude_next {
            if found {
                return false;
            }
            exclude_next = false;
        } else if require_next {
            if !found {
                return false;
            }
            require_next = false;
        } else if idx == 0 && !found {
            // The first term must match for the line to be a candidate.
            return false;
        }
    }

    return true;
}
