use std::path::{Path, PathBuf};

use crate::error::Error;

/// Project configuration loaded from `.chlog.toml`.
/// Points at the changelog archive and caps the persisted state lists.
pub struct Config {
    changelog_dir: PathBuf,
    manifest: String,
    max_bookmarks: usize,
    max_search_history: usize,
}

/// Raw TOML structure for `.chlog.toml`.
#[derive(serde::Deserialize)]
struct ChlogTomlConfig {
    #[serde(default)]
    changelog_dir: Option<String>,
    #[serde(default)]
    manifest: Option<String>,
    #[serde(default)]
    max_bookmarks: Option<usize>,
    #[serde(default)]
    max_search_history: Option<usize>,
}

impl Config {
    /// Load config from `.chlog.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist. Returns an error if the
    /// file exists but is malformed — never silently falls back to defaults
    /// when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".chlog.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::defaults()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: ChlogTomlConfig = toml::from_str(&content)?;
        let defaults = Self::defaults();
        Ok(Self {
            changelog_dir: raw
                .changelog_dir
                .map_or(defaults.changelog_dir, PathBuf::from),
            manifest: raw.manifest.unwrap_or(defaults.manifest),
            max_bookmarks: raw.max_bookmarks.unwrap_or(defaults.max_bookmarks),
            max_search_history: raw
                .max_search_history
                .unwrap_or(defaults.max_search_history),
        })
    }

    /// Built-in defaults used when no config file exists.
    fn defaults() -> Self {
        Self {
            changelog_dir: PathBuf::from("changelogs"),
            manifest: "versions.json".to_string(),
            max_bookmarks: 20,
            max_search_history: 10,
        }
    }

    /// Directory holding the changelog markdown files.
    pub fn changelog_dir(&self) -> &Path {
        &self.changelog_dir
    }

    /// Path of the version manifest inside the changelog directory.
    pub fn manifest_path(&self) -> PathBuf {
        self.changelog_dir.join(&self.manifest)
    }

    /// Maximum number of persisted bookmarks.
    pub fn max_bookmarks(&self) -> usize {
        self.max_bookmarks
    }

    /// Maximum number of persisted search history entries.
    pub fn max_search_history(&self) -> usize {
        self.max_search_history
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.changelog_dir(), Path::new("changelogs"));
        assert_eq!(config.max_search_history(), 10);
        assert_eq!(config.max_bookmarks(), 20);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".chlog.toml"), "changelog_dir = \"docs\"\n").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.changelog_dir(), Path::new("docs"));
        assert_eq!(config.manifest_path(), PathBuf::from("docs/versions.json"));
        assert_eq!(config.max_bookmarks(), 20);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".chlog.toml"), "changelog_dir = [").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
