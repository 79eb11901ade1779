//! Suggests the next tag for a branch.

use crate::domain::TagFormat;
use tracing::debug;

/// Suggest the tag that follows `last_tag`.
///
/// - No previous tag (`None` or empty): the format itself is the first tag.
/// - A previous tag that does not parse against the format's prefix: the
///   format is returned unchanged rather than a guessed version.
/// - Otherwise the patch component grows by one. Major and minor are kept,
///   and there is no carry: `g1.9.9` is followed by `g1.9.10`.
///
/// ```
/// # use tag_publish::planner::plan_next;
/// assert_eq!(plan_next(Some("v1.0.0"), "v0.0.0"), "v1.0.1");
/// assert_eq!(plan_next(Some("g1.9.9"), "g0.0.0"), "g1.9.10");
/// assert_eq!(plan_next(None, "v0.0.0"), "v0.0.0");
/// ```
pub fn plan_next(last_tag: Option<&str>, format: &str) -> String {
    let last_tag = match last_tag {
        Some(tag) if !tag.is_empty() => tag,
        _ => return format.to_string(),
    };

    let tag_format = TagFormat::new(format);
    match tag_format.parse(last_tag).ok().and_then(|v| v.next_patch()) {
        Some(next) => next.to_string(),
        None => {
            debug!(last_tag, format, "cannot derive next tag, using format");
            format.to_string()
        }
    }
}
