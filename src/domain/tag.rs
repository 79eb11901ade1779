use crate::domain::version::ParsedVersion;
use crate::error::Result;
use regex::Regex;

/// Returns the maximal leading substring of `format` that contains no ASCII digit.
///
/// A format without digits is its own prefix; a format starting with a digit
/// has an empty prefix.
///
/// ```
/// # use tag_publish::domain::extract_prefix;
/// assert_eq!(extract_prefix("v0.0.0"), "v");
/// assert_eq!(extract_prefix("release1.2.3"), "release");
/// assert_eq!(extract_prefix("1.0.0"), "");
/// ```
pub fn extract_prefix(format: &str) -> &str {
    match format.find(|c: char| c.is_ascii_digit()) {
        Some(idx) => &format[..idx],
        None => format,
    }
}

/// Per-branch tag template such as `v0.0.0` or `g0.0.0`.
///
/// The template doubles as the first tag created on a branch that has none.
#[derive(Debug, Clone)]
pub struct TagFormat {
    template: String,
    prefix: String,
    pattern: Option<Regex>,
}

impl TagFormat {
    /// Create a tag format from its template
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let prefix = extract_prefix(&template).to_string();
        let pattern = Regex::new(&format!(
            r"^{}[0-9]+\.[0-9]+\.[0-9]+$",
            regex::escape(&prefix)
        ))
        .ok();
        TagFormat {
            template,
            prefix,
            pattern,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Glob passed to the backend when enumerating candidate tags.
    pub fn glob(&self) -> String {
        format!("{}*", self.prefix)
    }

    /// Parse a tag that should carry this format's prefix.
    pub fn parse(&self, tag: &str) -> Result<ParsedVersion> {
        ParsedVersion::parse(tag, &self.prefix)
    }

    /// Check `tag` against `^<prefix>[0-9]+\.[0-9]+\.[0-9]+$`.
    ///
    /// Used to validate user input before any version comparison.
    pub fn matches(&self, tag: &str) -> bool {
        self.pattern.as_ref().is_some_and(|re| re.is_match(tag))
    }
}

impl PartialEq for TagFormat {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template
    }
}

impl Eq for TagFormat {}

impl std::fmt::Display for TagFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.template)
    }
}
