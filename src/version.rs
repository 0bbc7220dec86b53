//! Version identifier parsing and the total order over releases.

use std::collections::BTreeMap;

/// Release channel of a version. Stable releases sort before prereleases
/// of the same major.minor, and beta sorts before alpha (beta is the more
/// advanced prerelease).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// `-alpha` suffixed prerelease.
    Alpha,
    /// `-beta` suffixed prerelease.
    Beta,
    /// No prerelease suffix.
    Stable,
}

impl Channel {
    /// Rank within equal major.minor: stable first, then beta, then alpha.
    fn rank(self) -> u8 {
        return match self {
            Channel::Stable => 0,
            Channel::Beta => 1,
            Channel::Alpha => 2,
        };
    }

    /// The display suffix for this channel, empty for stable.
    fn suffix(self) -> &'static str {
        return match self {
            Channel::Stable => "",
            Channel::Beta => "-beta",
            Channel::Alpha => "-alpha",
        };
    }
}

/// A parsed changelog version. Derived purely from a file name on demand,
/// never mutated, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionId {
    /// Release channel parsed from the `-alpha`/`-beta` suffix.
    pub channel: Channel,
    /// The raw file name this version was parsed from (e.g. `5.9.md`).
    pub file_name: String,
    /// Major version number.
    pub major: u32,
    /// Minor version number.
    pub minor: u32,
}

impl VersionId {
    /// Parse a changelog file name such as `5.9.md` or `4.0-alpha.md`.
    ///
    /// Best-effort and total: malformed input never panics. A missing `.md`
    /// suffix is tolerated, and numeric parts that fail to parse fall back
    /// to `0`.
    pub fn parse(file_name: &str) -> Self {
        let base = file_name.strip_suffix(".md").unwrap_or(file_name);

        let channel = if base.contains("-alpha") {
            Channel::Alpha
        } else if base.contains("-beta") {
            Channel::Beta
        } else {
            Channel::Stable
        };

        let bare = base.replace("-alpha", "").replace("-beta", "");
        let (major_part, minor_part) = match bare.split_once('.') {
            None => (bare.as_str(), ""),
            Some((maj, min)) => (maj, min),
        };

        return Self {
            channel,
            file_name: file_name.to_string(),
            major: major_part.parse().unwrap_or(0),
            minor: minor_part.parse().unwrap_or(0),
        };
    }

    /// Deterministic display name: `"{major}.{minor}"` plus the channel suffix.
    pub fn display_name(&self) -> String {
        return format!("{}.{}{}", self.major, self.minor, self.channel.suffix());
    }
}

impl Ord for VersionId {
    /// Newest first: major desc, minor desc, then stable before beta before
    /// alpha. The raw file name is the final tie-break so that `Ord` stays
    /// consistent with `Eq`.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        return (other.major, other.minor)
            .cmp(&(self.major, self.minor))
            .then_with(|| return self.channel.rank().cmp(&other.channel.rank()))
            .then_with(|| return self.file_name.cmp(&other.file_name));
    }
}

impl PartialOrd for VersionId {
    /// Delegate to `Ord` implementation.
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        return Some(self.cmp(other));
    }
}

/// Group file names by major version, each group sorted newest first.
/// Used by the version list and the statistics table so every presentation
/// shares the same ordering.
pub fn group_by_major(files: &[String]) -> BTreeMap<u32, Vec<VersionId>> {
    let mut groups: BTreeMap<u32, Vec<VersionId>> = BTreeMap::new();
    for file in files {
        let parsed = VersionId::parse(file);
        groups.entry(parsed.major).or_default().push(parsed);
    }
    for versions in groups.values_mut() {
        versions.sort();
    }
    return groups;
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_version() {
        let v = VersionId::parse("5.9.md");
        assert_eq!(v.major, 5);
        assert_eq!(v.minor, 9);
        assert_eq!(v.channel, Channel::Stable);
        assert_eq!(v.display_name(), "5.9");
    }

    #[test]
    fn parses_prerelease_suffixes() {
        let alpha = VersionId::parse("4.0-alpha.md");
        assert_eq!(alpha.channel, Channel::Alpha);
        assert_eq!(alpha.display_name(), "4.0-alpha");

        let beta = VersionId::parse("4.0-beta.md");
        assert_eq!(beta.channel, Channel::Beta);
        assert_eq!(beta.display_name(), "4.0-beta");
    }

    #[test]
    fn malformed_input_falls_back_to_zero() {
        let v = VersionId::parse("notes.md");
        assert_eq!(v.major, 0);
        assert_eq!(v.minor, 0);
        assert_eq!(v.channel, Channel::Stable);

        let bare = VersionId::parse("5");
        assert_eq!(bare.major, 5);
        assert_eq!(bare.minor, 0);
    }

    #[test]
    fn newer_sorts_first() {
        let newer = VersionId::parse("5.9.md");
        let older = VersionId::parse("5.8.md");
        assert!(newer < older);

        let major = VersionId::parse("5.0.md");
        let prev_major = VersionId::parse("4.21.md");
        assert!(major < prev_major);
    }

    #[test]
    fn stable_sorts_before_prereleases() {
        let stable = VersionId::parse("5.0.md");
        let beta = VersionId::parse("5.0-beta.md");
        let alpha = VersionId::parse("5.0-alpha.md");
        assert!(stable < beta);
        assert!(stable < alpha);
        assert!(beta < alpha);
    }

    #[test]
    fn groups_sorted_within_major() {
        let files = vec![
            "5.0.md".to_string(),
            "4.2.md".to_string(),
            "5.1.md".to_string(),
        ];
        let groups = group_by_major(&files);
        assert_eq!(groups.len(), 2);
        let fives: Vec<String> = groups[&5].iter().map(VersionId::display_name).collect();
        assert_eq!(fives, vec!["5.1", "5.0"]);
    }
}
