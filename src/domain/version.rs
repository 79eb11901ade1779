use crate::error::{Result, TagPublishError};
use std::cmp::Ordering;
use std::fmt;

/// A `<prefix><major>.<minor>.<patch>` tag split into its parts.
///
/// Ordering is driven by the numeric components; the prefix only breaks ties
/// between otherwise equal versions, so that `Ord` agrees with `Eq`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersion {
    pub prefix: String,
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl ParsedVersion {
    /// Create a new version
    pub fn new(prefix: impl Into<String>, major: u64, minor: u64, patch: u64) -> Self {
        ParsedVersion {
            prefix: prefix.into(),
            major,
            minor,
            patch,
        }
    }

    /// Parse `tag` against an expected `prefix`.
    ///
    /// The tag must start with `prefix` and the remainder must be exactly three
    /// dot-separated runs of ASCII digits. Signs, whitespace and empty components
    /// are rejected; leading zeros are accepted.
    ///
    /// # Example
    /// ```
    /// # use tag_publish::domain::ParsedVersion;
    /// let v = ParsedVersion::parse("g1.9.10", "g").unwrap();
    /// assert_eq!((v.major, v.minor, v.patch), (1, 9, 10));
    /// assert!(ParsedVersion::parse("v1.a.3", "v").is_err());
    /// ```
    pub fn parse(tag: &str, prefix: &str) -> Result<Self> {
        let version_part = tag.strip_prefix(prefix).ok_or_else(|| {
            TagPublishError::version(format!(
                "Tag '{}' does not start with prefix '{}'",
                tag, prefix
            ))
        })?;

        let parts: Vec<&str> = version_part.split('.').collect();
        if parts.len() != 3 {
            return Err(TagPublishError::version(format!(
                "Invalid version format: '{}' - expected {}X.Y.Z",
                tag, prefix
            )));
        }

        let major = parse_component(parts[0], "major")?;
        let minor = parse_component(parts[1], "minor")?;
        let patch = parse_component(parts[2], "patch")?;

        Ok(ParsedVersion::new(prefix, major, minor, patch))
    }

    /// Compose a tag string from its parts.
    pub fn format(prefix: &str, major: u64, minor: u64, patch: u64) -> String {
        format!("{}{}.{}.{}", prefix, major, minor, patch)
    }

    /// Numeric components as a tuple, in comparison order.
    pub fn triple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    /// Next patch release. Returns `None` when the patch counter cannot grow.
    ///
    /// Never carries into `minor`: `1.9.9` becomes `1.9.10`.
    pub fn next_patch(&self) -> Option<Self> {
        Some(ParsedVersion {
            prefix: self.prefix.clone(),
            major: self.major,
            minor: self.minor,
            patch: self.patch.checked_add(1)?,
        })
    }
}

fn parse_component(part: &str, name: &str) -> Result<u64> {
    // `u64::from_str` accepts a leading '+', so check the digits first
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TagPublishError::version(format!(
            "Invalid {} version: '{}'",
            name, part
        )));
    }
    part.parse::<u64>().map_err(|_| {
        TagPublishError::version(format!("{} version out of range: '{}'", name, part))
    })
}

impl PartialOrd for ParsedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParsedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple()
            .cmp(&other.triple())
            .then_with(|| self.prefix.cmp(&other.prefix))
    }
}

impl fmt::Display for ParsedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ParsedVersion::format(
            &self.prefix,
            self.major,
            self.minor,
            self.patch,
        ))
    }
}
