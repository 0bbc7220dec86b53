//! Session state: the version manifest, the content source, and the cache.
//!
//! One `Session` owns everything a browsing operation needs, so independent
//! sessions (and tests) never share mutable state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;
use crate::version::VersionId;

/// Transport collaborator: maps a changelog file name to its raw text.
/// The production source reads from the archive directory; tests substitute
/// an in-memory map.
pub trait ContentSource {
    /// Fetch the raw text of one changelog file.
    ///
    /// # Errors
    ///
    /// Returns `Error::ChangelogNotFound` if the file cannot be read.
    fn fetch(&self, file_name: &str) -> Result<String, Error>;
}

/// Reads changelog files from a directory on disk.
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    /// A source rooted at the given archive directory.
    pub fn new(dir: &Path) -> Self {
        return Self { dir: dir.to_path_buf() };
    }
}

impl ContentSource for DirSource {
    /// Read one changelog file from the archive directory.
    ///
    /// # Errors
    ///
    /// Returns `Error::ChangelogNotFound` if the file cannot be read.
    fn fetch(&self, file_name: &str) -> Result<String, Error> {
        return std::fs::read_to_string(self.dir.join(file_name)).map_err(|_err| {
            return Error::ChangelogNotFound { version: file_name.to_string() };
        });
    }
}

/// Raw JSON structure of the version manifest.
#[derive(serde::Deserialize)]
struct Manifest {
    versions: Vec<String>,
}

/// A browsing session over one changelog archive. Owns the ordered version
/// list, the content cache, and the transport source. Cache entries are
/// immutable once written and are never evicted — the archive is tens of
/// files, not thousands.
pub struct Session {
    cache: HashMap<String, String>,
    source: Box<dyn ContentSource>,
    versions: Vec<String>,
}

impl Session {
    /// Open a session for the archive described by the config.
    ///
    /// The version list comes from the JSON manifest when present; otherwise
    /// the archive directory is walked for `*.md` files. Either way the list
    /// is sorted newest first.
    ///
    /// # Errors
    ///
    /// Returns `Error::JsonDe` if the manifest is malformed, `Error::Io` on
    /// read failures, or `Error::ManifestNotFound` if neither a manifest nor
    /// any changelog file exists.
    pub fn open(config: &Config) -> Result<Self, Error> {
        let dir = config.changelog_dir();
        let files = match std::fs::read_to_string(config.manifest_path()) {
            Ok(content) => {
                let manifest: Manifest = serde_json::from_str(&content)?;
                manifest.versions
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => discover_changelogs(dir),
            Err(e) => return Err(Error::Io(e)),
        };

        if files.is_empty() {
            return Err(Error::ManifestNotFound { path: dir.to_path_buf() });
        }

        let source = Box::new(DirSource::new(dir));
        return Ok(Self::from_parts(files, source));
    }

    /// Build a session from an explicit version list and source.
    pub fn from_parts(mut versions: Vec<String>, source: Box<dyn ContentSource>) -> Self {
        versions.sort_by_key(|file| return VersionId::parse(file));
        return Self {
            cache: HashMap::new(),
            source,
            versions,
        };
    }

    /// The known changelog file names, newest first.
    pub fn versions(&self) -> &[String] {
        return &self.versions;
    }

    /// Version file names restricted to one major version, or all of them.
    pub fn versions_for_major(&self, major: Option<u32>) -> Vec<String> {
        return match major {
            None => self.versions.clone(),
            Some(m) => self
                .versions
                .iter()
                .filter(|file| return VersionId::parse(file).major == m)
                .cloned()
                .collect(),
        };
    }

    /// Resolve user input to a manifest entry. Accepts the exact file name
    /// (`5.9.md`), the bare name (`5.9`), or a parsed display name
    /// (`4.0-beta`).
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownVersion` if nothing in the manifest matches.
    pub fn resolve(&self, name: &str) -> Result<String, Error> {
        let with_suffix = format!("{name}.md");
        for file in &self.versions {
            if file == name || *file == with_suffix {
                return Ok(file.clone());
            }
        }
        for file in &self.versions {
            if VersionId::parse(file).display_name() == name {
                return Ok(file.clone());
            }
        }
        return Err(Error::UnknownVersion { name: name.to_string() });
    }

    /// The raw text of one changelog, fetching through the source at most
    /// once per file name.
    ///
    /// # Errors
    ///
    /// Returns `Error::ChangelogNotFound` if the content cannot be fetched.
    pub fn content(&mut self, file_name: &str) -> Result<&str, Error> {
        if !self.cache.contains_key(file_name) {
            let text = self.source.fetch(file_name)?;
            self.cache.insert(file_name.to_string(), text);
        }
        return Ok(self.cache.get(file_name).map_or("", String::as_str));
    }

    /// Like `content`, but a fetch failure becomes `None`. Batch consumers
    /// (multi-version search, statistics) use this so one bad file never
    /// aborts the whole run.
    pub fn try_content(&mut self, file_name: &str) -> Option<&str> {
        return self.content(file_name).ok();
    }
}

/// Walk the archive directory for `*.md` files when no manifest exists.
fn discover_changelogs(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = Vec::new();
    for entry in WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| return e.path().extension().is_some_and(|ext| return ext == "md"))
    {
        files.push(entry.file_name().to_string_lossy().to_string());
    }
    return files;
}
