use crate::domain::BranchRef;
use crate::git::TagBackend;
use git2::Oid;
use tracing::{debug, warn};

/// Resolve a branch to its tip commit, local name first, then `<remote>/<branch>`.
///
/// Backend errors count as "does not resolve".
pub fn resolve_branch<B: TagBackend + ?Sized>(
    backend: &B,
    branch: &str,
    remote: &str,
) -> Option<Oid> {
    for name in BranchRef::new(branch).resolution_order(remote) {
        match backend.resolve_commit(&name) {
            Ok(Some(oid)) => {
                debug!(branch = %name, commit = %oid, "resolved branch");
                return Some(oid);
            }
            Ok(None) => debug!(branch = %name, "branch ref not found"),
            Err(e) => warn!(branch = %name, error = %e, "failed to resolve branch"),
        }
    }
    None
}

/// Decides whether a tag belongs to a branch's history.
///
/// Every backend failure is converted to `false`, so a missing tag or an
/// unfetched branch simply removes the candidate.
pub struct AncestryOracle<'a, B: TagBackend + ?Sized> {
    backend: &'a B,
    remote: String,
}

impl<'a, B: TagBackend + ?Sized> AncestryOracle<'a, B> {
    /// Create an oracle that falls back to `remote` for branches missing locally
    pub fn new(backend: &'a B, remote: impl Into<String>) -> Self {
        AncestryOracle {
            backend,
            remote: remote.into(),
        }
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Whether the commit `tag` points at is the tip of `branch` or one of its ancestors.
    pub fn is_on_branch(&self, tag: &str, branch: &str) -> bool {
        match self.backend.tag_exists(tag) {
            Ok(true) => {}
            Ok(false) => return false,
            Err(e) => {
                warn!(tag, error = %e, "tag existence check failed");
                return false;
            }
        }

        let tag_commit = match self.backend.resolve_commit(tag) {
            Ok(Some(oid)) => oid,
            Ok(None) => return false,
            Err(e) => {
                warn!(tag, error = %e, "cannot resolve tag commit");
                return false;
            }
        };

        let Some(branch_commit) = resolve_branch(self.backend, branch, &self.remote) else {
            return false;
        };

        if tag_commit == branch_commit {
            return true;
        }

        match self.backend.is_ancestor(tag_commit, branch_commit) {
            Ok(reachable) => {
                debug!(tag, branch, reachable, "ancestry check");
                reachable
            }
            Err(e) => {
                warn!(tag, branch, error = %e, "ancestry check failed");
                false
            }
        }
    }
}
