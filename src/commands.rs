//! CLI command handlers: list, show, search, compare, stats, bookmarks, history.

use std::path::PathBuf;

use crate::compare;
use crate::config::Config;
use crate::error::Error;
use crate::report;
use crate::search::{self, SearchOptions};
use crate::session::Session;
use crate::state::State;
use crate::stats;
use crate::version::{self, VersionId};

/// List all known versions grouped by major version, newest first.
/// Bookmarked versions are marked with `*`.
///
/// # Errors
///
/// Returns errors from config, manifest, or state loading.
pub fn list() -> Result<(), Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let session = Session::open(&config)?;
    let state = State::load(&root)?;

    let groups = version::group_by_major(session.versions());
    for (major, versions) in groups.iter().rev() {
        println!("{major}.x");
        for v in versions {
            let marker = if state.is_bookmarked(&v.file_name) { "*" } else { " " };
            println!("  {marker} {}", v.display_name());
        }
    }
    return Ok(());
}

/// Print one changelog's raw markdown and remember it as the last viewed
/// version. With no argument, reopens the last viewed version.
///
/// # Errors
///
/// Returns `Error::NoLastVersion` when called bare before any `show`,
/// `Error::UnknownVersion` for names not in the manifest, or
/// `Error::ChangelogNotFound` if the content cannot be read.
pub fn show(name: Option<&str>) -> Result<(), Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let mut session = Session::open(&config)?;
    let mut state = State::load(&root)?;

    let file = match name {
        Some(n) => session.resolve(n)?,
        None => state.last_version.clone().ok_or(Error::NoLastVersion)?,
    };

    let display = VersionId::parse(&file).display_name();
    let content = session.content(&file)?.to_string();

    println!("Version {display}");
    println!();
    println!("{content}");

    state.save_last_version(&file);
    state.save(&root)?;
    return Ok(());
}

/// Scope of a multi-version search.
pub struct SearchScope {
    /// Restrict to the last viewed version only.
    pub current_only: bool,
    /// Restrict to one major version.
    pub major: Option<u32>,
}

/// Search the archive and print matching lines per version. The query is
/// recorded in the search history. No matches is a normal outcome, not an
/// error.
///
/// # Errors
///
/// Returns `Error::NoLastVersion` for `--current` before any `show`, or
/// errors from config, manifest, or state handling. Per-version fetch
/// failures are skipped, never propagated.
pub fn search(query: &str, options: &SearchOptions, scope: &SearchScope) -> Result<(), Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let mut session = Session::open(&config)?;
    let mut state = State::load(&root)?;

    let files = if scope.current_only {
        vec![state.last_version.clone().ok_or(Error::NoLastVersion)?]
    } else {
        session.versions_for_major(scope.major)
    };

    let results = search::search_versions(&mut session, &files, query, options);
    print!("{}", report::render_search_results(&results, query));

    state.add_search_term(query, config.max_search_history());
    state.save(&root)?;
    return Ok(());
}

/// Compare two versions section by section and print the diff.
///
/// # Errors
///
/// Returns `Error::UnknownVersion` or `Error::ChangelogNotFound` for either
/// side, or `Error::EmptyCompareInput` when a changelog is empty.
pub fn compare(name_a: &str, name_b: &str) -> Result<(), Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let mut session = Session::open(&config)?;

    let file_a = session.resolve(name_a)?;
    let file_b = session.resolve(name_b)?;

    if file_a == file_b {
        println!("Select two different versions to compare.");
        return Ok(());
    }

    let content_a = session.content(&file_a)?.to_string();
    let content_b = session.content(&file_b)?.to_string();
    let diffs = compare::compare(&content_a, &content_b)?;

    let display_a = VersionId::parse(&file_a).display_name();
    let display_b = VersionId::parse(&file_b).display_name();
    print!("{}", report::render_diff(&diffs, &display_a, &display_b));
    return Ok(());
}

/// Aggregate and print statistics over the whole archive. Unreadable
/// changelogs are skipped.
///
/// # Errors
///
/// Returns errors from config or manifest loading.
pub fn stats() -> Result<(), Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let mut session = Session::open(&config)?;

    let summary = stats::analyze(&mut session);
    print!("{}", report::render_stats(&summary));
    return Ok(());
}

/// Bookmark a version.
///
/// # Errors
///
/// Returns `Error::UnknownVersion` or errors from state I/O.
pub fn bookmark_add(name: &str) -> Result<(), Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let session = Session::open(&config)?;
    let mut state = State::load(&root)?;

    let file = session.resolve(name)?;
    if state.add_bookmark(&file, config.max_bookmarks()) {
        state.save(&root)?;
        println!("Bookmarked {}", VersionId::parse(&file).display_name());
    } else {
        println!("Already bookmarked.");
    }
    return Ok(());
}

/// Remove a bookmark.
///
/// # Errors
///
/// Returns `Error::UnknownVersion` or errors from state I/O.
pub fn bookmark_remove(name: &str) -> Result<(), Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let session = Session::open(&config)?;
    let mut state = State::load(&root)?;

    let file = session.resolve(name)?;
    if state.remove_bookmark(&file) {
        state.save(&root)?;
        println!("Removed bookmark {}", VersionId::parse(&file).display_name());
    } else {
        println!("Not bookmarked.");
    }
    return Ok(());
}

/// List bookmarked versions in insertion order.
///
/// # Errors
///
/// Returns errors from state loading.
pub fn bookmark_list() -> Result<(), Error> {
    let root = PathBuf::from(".");
    let state = State::load(&root)?;

    if state.bookmarks.is_empty() {
        println!("No bookmarks.");
        return Ok(());
    }
    for file in &state.bookmarks {
        println!("{}", VersionId::parse(file).display_name());
    }
    return Ok(());
}

/// Print the saved search history, most recent first.
///
/// # Errors
///
/// Returns errors from state loading.
pub fn history() -> Result<(), Error> {
    let root = PathBuf::from(".");
    let state = State::load(&root)?;

    if state.search_history.is_empty() {
        println!("No search history.");
        return Ok(());
    }
    for term in &state.search_history {
        println!("{term}");
    }
    return Ok(());
}
