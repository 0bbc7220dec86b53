//! Persisted session state: last viewed version, search history, bookmarks.
//!
//! Stored as `.chlog-state.toml` in the working directory. A missing file is
//! an empty state; a malformed one is reported, never silently reset.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// File name of the persisted state.
const STATE_FILE: &str = ".chlog-state.toml";

/// Everything chlog remembers between runs.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct State {
    /// Bookmarked changelog file names, in insertion order.
    #[serde(default)]
    pub bookmarks: Vec<String>,
    /// The last changelog shown, reopened by `show` with no argument.
    #[serde(default)]
    pub last_version: Option<String>,
    /// Past search queries, most recent first, deduplicated.
    #[serde(default)]
    pub search_history: Vec<String>,
}

impl State {
    /// Load the state from the given root directory. A missing file yields
    /// the empty state.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` on read failures other than not-found,
    /// or `Error::StateCorrupt` if the file cannot be parsed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(state_path(root)) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return toml::from_str(&content).map_err(|e| {
            return Error::StateCorrupt { reason: e.to_string() };
        });
    }

    /// Write the state back to disk.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlSer` if serialization fails,
    /// or `Error::Io` if the file cannot be written.
    pub fn save(&self, root: &Path) -> Result<(), Error> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(state_path(root), content)?;
        return Ok(());
    }

    /// Record a search query: moved to the front, deduplicated, capped.
    pub fn add_search_term(&mut self, term: &str, max_entries: usize) {
        self.search_history.retain(|t| return t != term);
        self.search_history.insert(0, term.to_string());
        self.search_history.truncate(max_entries);
        return;
    }

    /// Record the last viewed version.
    pub fn save_last_version(&mut self, file_name: &str) {
        self.last_version = Some(file_name.to_string());
        return;
    }

    /// Add a bookmark. Duplicates are ignored; the oldest bookmark is
    /// dropped when the cap is reached. Returns whether anything changed.
    pub fn add_bookmark(&mut self, file_name: &str, max_entries: usize) -> bool {
        if self.bookmarks.iter().any(|b| return b == file_name) {
            return false;
        }
        if self.bookmarks.len() >= max_entries {
            self.bookmarks.remove(0);
        }
        self.bookmarks.push(file_name.to_string());
        return true;
    }

    /// Remove a bookmark. Returns whether it was present.
    pub fn remove_bookmark(&mut self, file_name: &str) -> bool {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|b| return b != file_name);
        return self.bookmarks.len() != before;
    }

    /// Whether a version is bookmarked.
    pub fn is_bookmarked(&self, file_name: &str) -> bool {
        return self.bookmarks.iter().any(|b| return b == file_name);
    }
}

/// Path of the state file under the given root.
fn state_path(root: &Path) -> PathBuf {
    return root.join(STATE_FILE);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = State::load(dir.path()).unwrap();
        assert!(state.bookmarks.is_empty());
        assert!(state.last_version.is_none());
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = State::default();
        state.save_last_version("5.1.md");
        state.add_search_term("creeper", 10);
        state.save(dir.path()).unwrap();

        let loaded = State::load(dir.path()).unwrap();
        assert_eq!(loaded.last_version.as_deref(), Some("5.1.md"));
        assert_eq!(loaded.search_history, vec!["creeper"]);
    }

    #[test]
    fn malformed_file_is_state_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STATE_FILE), "bookmarks = 3").unwrap();
        assert!(matches!(
            State::load(dir.path()),
            Err(Error::StateCorrupt { .. })
        ));
    }

    #[test]
    fn search_history_dedupes_and_caps() {
        let mut state = State::default();
        state.add_search_term("a", 3);
        state.add_search_term("b", 3);
        state.add_search_term("a", 3);
        assert_eq!(state.search_history, vec!["a", "b"]);

        state.add_search_term("c", 3);
        state.add_search_term("d", 3);
        assert_eq!(state.search_history, vec!["d", "c", "a"]);
    }

    #[test]
    fn bookmarks_cap_drops_oldest() {
        let mut state = State::default();
        assert!(state.add_bookmark("5.0.md", 2));
        assert!(!state.add_bookmark("5.0.md", 2));
        assert!(state.add_bookmark("5.1.md", 2));
        assert!(state.add_bookmark("5.2.md", 2));
        assert_eq!(state.bookmarks, vec!["5.1.md", "5.2.md"]);
        assert!(!state.is_bookmarked("5.0.md"));

        assert!(state.remove_bookmark("5.1.md"));
        assert!(!state.remove_bookmark("5.1.md"));
    }
}
