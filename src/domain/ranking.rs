//! Numeric ordering of tag strings.
//!
//! Tags are never compared as text: `g1.9.10` sorts after `g1.9.9`.

use crate::domain::tag::extract_prefix;
use crate::domain::version::ParsedVersion;
use std::cmp::Ordering;

/// Compare two tags that share a prefix.
///
/// The prefix is taken from `a` and used to parse both tags. A tag that does
/// not parse ranks below every tag that does, and two unparsable tags are
/// equal.
pub fn compare_tags(a: &str, b: &str) -> Ordering {
    compare_with_prefix(a, b, extract_prefix(a))
}

/// Compare two tags under an explicit prefix, with the same fallbacks as
/// [`compare_tags`]. Symmetric, so it is safe to hand to `sort_by`.
pub fn compare_with_prefix(a: &str, b: &str, prefix: &str) -> Ordering {
    match (
        ParsedVersion::parse(a, prefix),
        ParsedVersion::parse(b, prefix),
    ) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Ok(_)) => Ordering::Less,
        (Err(_), Err(_)) => Ordering::Equal,
    }
}

/// Whether `new_tag` is a strictly higher version than `old_tag`.
///
/// With no previous tag (`None` or empty) any tag is accepted. Otherwise both
/// tags must parse with the prefix of `new_tag`, and the result is `false` if
/// either does not.
pub fn is_greater(new_tag: &str, old_tag: Option<&str>) -> bool {
    let old_tag = match old_tag {
        Some(old) if !old.is_empty() => old,
        _ => return true,
    };

    let prefix = extract_prefix(new_tag);
    match (
        ParsedVersion::parse(new_tag, prefix),
        ParsedVersion::parse(old_tag, prefix),
    ) {
        (Ok(new), Ok(old)) => new > old,
        _ => false,
    }
}

/// Sort tags carrying `prefix` ascending by version. Unparsable tags move to the front.
pub fn sort_tags(tags: &mut [String], prefix: &str) {
    tags.sort_by(|a, b| compare_with_prefix(a, b, prefix));
}

/// Sort tags descending by version, the order backends hand candidates out in.
pub fn sort_tags_descending(tags: &mut [String], prefix: &str) {
    tags.sort_by(|a, b| compare_with_prefix(b, a, prefix));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_greater() {
        let cases = [
            ("v1.0.1", "v1.0.0", true),
            ("v1.1.0", "v1.0.0", true),
            ("v2.0.0", "v1.0.0", true),
            ("v1.0.0", "v1.0.0", false),
            ("v1.0.0", "v1.0.1", false),
            ("v1.0.0", "v1.1.0", false),
            ("v1.0.0", "v2.0.0", false),
            ("g1.0.1", "g1.0.0", true),
            ("dev2.0.0", "dev1.9.9", true),
        ];
        for (new, old, expected) in cases {
            assert_eq!(
                is_greater(new, Some(old)),
                expected,
                "is_greater({:?}, {:?})",
                new,
                old
            );
        }
    }

    #[test]
    fn test_is_greater_without_previous_tag() {
        assert!(is_greater("v1.0.0", None));
        assert!(is_greater("v1.0.0", Some("")));
        assert!(is_greater("g0.0.0", None));
    }

    #[test]
    fn test_is_greater_numeric_not_lexical() {
        assert!(is_greater("g1.9.10", Some("g1.9.9")));
        assert!(is_greater("v1.10.0", Some("v1.9.0")));
        assert!(!is_greater("v1.9.0", Some("v1.10.0")));
    }

    #[test]
    fn test_is_greater_malformed() {
        assert!(!is_greater("v1.0", Some("v1.0.0")));
        assert!(!is_greater("v2.0.0", Some("v1.x.0")));
        assert!(!is_greater("v2.0.0", Some("g1.0.0")));
    }

    #[test]
    fn test_compare_tags() {
        assert_eq!(compare_tags("v1.0.0", "v1.0.0"), Ordering::Equal);
        assert_eq!(compare_tags("v1.0.10", "v1.0.9"), Ordering::Greater);
        assert_eq!(compare_tags("v0.9.0", "v1.0.0"), Ordering::Less);
    }

    #[test]
    fn test_compare_tags_unparsable_is_lowest() {
        assert_eq!(compare_tags("v0.0.0", "vbad"), Ordering::Greater);
        assert_eq!(compare_tags("v1.2", "v0.0.0"), Ordering::Less);
        assert_eq!(compare_tags("v1.2", "v1.x.3"), Ordering::Equal);
    }

    #[test]
    fn test_compare_agrees_with_tuple_order() {
        let triples = [(0, 0, 0), (0, 0, 9), (0, 0, 10), (0, 1, 0), (1, 0, 0), (1, 9, 10)];
        for a in triples {
            for b in triples {
                let ta = ParsedVersion::format("v", a.0, a.1, a.2);
                let tb = ParsedVersion::format("v", b.0, b.1, b.2);
                assert_eq!(compare_tags(&ta, &tb), a.cmp(&b), "{} vs {}", ta, tb);
            }
        }
    }

    #[test]
    fn test_sort_is_numeric() {
        let mut tags: Vec<String> = ["g1.10.0", "g1.9.9", "g1.9.10", "g2.0.0", "g1.9.1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        sort_tags(&mut tags, "g");
        assert_eq!(tags, vec!["g1.9.1", "g1.9.9", "g1.9.10", "g1.10.0", "g2.0.0"]);
    }

    #[test]
    fn test_sort_descending() {
        let mut tags: Vec<String> = ["v1.0.9", "vnext", "v1.0.10"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        sort_tags_descending(&mut tags, "v");
        assert_eq!(tags, vec!["v1.0.10", "v1.0.9", "vnext"]);
    }
}
