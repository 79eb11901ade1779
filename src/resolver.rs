//! Finds the most recent tag of a branch that matches its tag format.

use crate::domain::ranking::compare_with_prefix;
use crate::domain::TagFormat;
use crate::git::{AncestryOracle, TagBackend};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How [`TagResolver`] picks among candidates that pass both checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolveStrategy {
    /// First candidate in backend order. Equals the highest version as long
    /// as the backend lists candidates highest first.
    #[default]
    FirstMatch,
    /// Check every candidate and return the highest version.
    Highest,
}

/// Resolves the last tag of a branch from the backend's tag set
pub struct TagResolver<'a, B: TagBackend + ?Sized> {
    backend: &'a B,
    oracle: AncestryOracle<'a, B>,
    strategy: ResolveStrategy,
}

impl<'a, B: TagBackend + ?Sized> TagResolver<'a, B> {
    /// Create a resolver; `remote` is the fallback for branches missing locally
    pub fn new(backend: &'a B, remote: &str) -> Self {
        TagResolver {
            backend,
            oracle: AncestryOracle::new(backend, remote),
            strategy: ResolveStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: ResolveStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Last tag on `branch` that is well formed for `format`.
    ///
    /// Returns `None` when the repository has no tags, when no candidate
    /// lies in the branch history, or when the backend cannot be queried.
    /// `None` means the next tag is the first one for this branch.
    pub fn resolve_last(&self, branch: &str, format: &str) -> Option<String> {
        match self.backend.has_tags() {
            Ok(true) => {}
            Ok(false) => {
                debug!("repository has no tags");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "cannot check for tags");
                return None;
            }
        }

        let format = TagFormat::new(format);
        let candidates = match self.backend.list_tags(&format.glob()) {
            Ok(tags) => tags,
            Err(e) => {
                warn!(glob = %format.glob(), error = %e, "cannot list tags");
                return None;
            }
        };

        let mut accepted = candidates
            .into_iter()
            .filter(|tag| !tag.is_empty())
            .filter(|tag| self.is_candidate(tag, branch, &format));

        match self.strategy {
            ResolveStrategy::FirstMatch => accepted.next(),
            ResolveStrategy::Highest => {
                accepted.max_by(|a, b| compare_with_prefix(a, b, format.prefix()))
            }
        }
    }

    fn is_candidate(&self, tag: &str, branch: &str, format: &TagFormat) -> bool {
        if !self.oracle.is_on_branch(tag, branch) {
            debug!(tag, branch, "skipping tag outside branch history");
            return false;
        }
        if format.parse(tag).is_err() {
            debug!(tag, format = %format, "skipping tag with unexpected shape");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use git2::Oid;

    fn oid(n: u8) -> Oid {
        Oid::from_bytes(&[n; 20]).unwrap()
    }

    fn linear_repo() -> MockRepository {
        let repo = MockRepository::new();
        repo.add_commit(oid(1), &[]);
        repo.add_commit(oid(2), &[oid(1)]);
        repo.add_commit(oid(3), &[oid(2)]);
        repo.set_branch_head("main", oid(3));
        repo
    }

    #[test]
    fn test_no_tags_short_circuits() {
        let repo = linear_repo();
        let resolver = TagResolver::new(&repo, "origin");
        assert_eq!(resolver.resolve_last("main", "v0.0.0"), None);
        assert_eq!(repo.calls(), vec!["has_tags"]);
    }

    #[test]
    fn test_first_match_in_backend_order() {
        let repo = linear_repo();
        repo.add_tag("v1.0.1", oid(2));
        repo.add_tag("v1.0.0", oid(1));
        let resolver = TagResolver::new(&repo, "origin");
        assert_eq!(resolver.resolve_last("main", "v0.0.0").as_deref(), Some("v1.0.1"));
    }

    #[test]
    fn test_skips_malformed_candidates() {
        let repo = linear_repo();
        repo.add_tag("v1.1", oid(3));
        repo.add_tag("v1.0.0-rc1", oid(3));
        repo.add_tag("v1.0.0", oid(2));
        let resolver = TagResolver::new(&repo, "origin");
        assert_eq!(resolver.resolve_last("main", "v0.0.0").as_deref(), Some("v1.0.0"));
    }

    #[test]
    fn test_highest_strategy_ignores_backend_order() {
        let repo = linear_repo();
        repo.add_tag("v1.0.9", oid(2));
        repo.add_tag("v1.0.10", oid(3));
        let first = TagResolver::new(&repo, "origin");
        let highest = TagResolver::new(&repo, "origin").with_strategy(ResolveStrategy::Highest);

        assert_eq!(first.resolve_last("main", "v0.0.0").as_deref(), Some("v1.0.9"));
        assert_eq!(highest.resolve_last("main", "v0.0.0").as_deref(), Some("v1.0.10"));
    }

    #[test]
    fn test_list_failure_degrades_to_none() {
        let repo = linear_repo();
        repo.add_tag("v1.0.0", oid(1));
        repo.fail_queries_for("v*");
        let resolver = TagResolver::new(&repo, "origin");
        assert_eq!(resolver.resolve_last("main", "v0.0.0"), None);
    }

    #[test]
    fn test_strategy_deserializes_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            strategy: ResolveStrategy,
        }
        let parsed: Wrapper = toml::from_str("strategy = \"highest\"").unwrap();
        assert_eq!(parsed.strategy, ResolveStrategy::Highest);
        let parsed: Wrapper = toml::from_str("strategy = \"first-match\"").unwrap();
        assert_eq!(parsed.strategy, ResolveStrategy::FirstMatch);
    }
}
