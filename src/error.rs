/// Crate-level error types for chlog diagnostics.
use std::path::PathBuf;

/// All errors in chlog carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the version, file, or reason for
/// failure. Nothing here is fatal to the process: batch operations skip
/// failed items, single-item operations surface the variant to the caller.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A changelog file listed in the manifest could not be read.
    #[error("changelog not found: {version}")]
    ChangelogNotFound {
        /// File name of the changelog that failed to load.
        version: String,
    },

    /// Compare was called with empty text on one side.
    #[error("cannot compare empty content: {side} side is empty")]
    EmptyCompareInput {
        /// Which input was empty (`"left"` or `"right"`).
        side: &'static str,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// Version manifest exists but is not valid JSON.
    #[error("json deserialize: {0}")]
    JsonDe(
        /// The wrapped JSON deserialization error.
        #[from]
        serde_json::Error,
    ),

    /// No version manifest and no changelog files were found.
    #[error("no changelogs found under {}", path.display())]
    ManifestNotFound {
        /// Directory that was searched for changelogs.
        path: PathBuf,
    },

    /// `show` was invoked with no argument and no version has been viewed yet.
    #[error("no version viewed yet (run `chlog show <version>` first)")]
    NoLastVersion,

    /// State file exists but cannot be parsed.
    #[error("state file corrupt: {reason}")]
    StateCorrupt {
        /// Description of the corruption.
        reason: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// TOML serialization failed.
    #[error("toml serialize: {0}")]
    TomlSer(
        /// The wrapped TOML serialization error.
        #[from]
        toml::ser::Error,
    ),

    /// No manifest entry matches the given version name.
    #[error("unknown version: `{name}`")]
    UnknownVersion {
        /// Version name that was not found.
        name: String,
    },
}
