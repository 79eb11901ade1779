//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the version-control
//! backend, allowing the tag resolution logic to run against a real git
//! repository or an in-memory fake.
//!
//! # Overview
//!
//! - [TagBackend]: the read-only queries tag resolution needs (tag existence,
//!   tag enumeration, commit resolution, ancestry).
//! - [Repository]: extends [TagBackend] with the operations the publish
//!   workflow performs (branch and remote listing, tag creation, push, fetch).
//!
//! Implementations:
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory implementation for testing
//!
//! # Usage
//!
//! ```rust
//! # use tag_publish::git::{AncestryOracle, TagBackend};
//! # fn example<B: TagBackend>(backend: &B) {
//! let oracle = AncestryOracle::new(backend, "origin");
//! if oracle.is_on_branch("v1.0.0", "main") {
//!     println!("v1.0.0 is part of main");
//! }
//! # }
//! ```

pub mod ancestry;
pub mod mock;
pub mod repository;

pub use ancestry::AncestryOracle;
pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;
use std::time::Duration;

/// A configured remote and its fetch URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInfo {
    pub name: String,
    pub url: String,
}

impl RemoteInfo {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        RemoteInfo {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// How a bounded fetch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Remote branches (and tags, if any) are up to date
    Completed,
    /// The deadline elapsed first; local state is used as-is
    TimedOut,
}

/// Read-only queries against the version-control backend.
///
/// Every method is a point query: no method mutates the repository, so
/// callers may invoke them repeatedly.
///
/// ## Error Handling
///
/// Methods return [crate::error::Result<T>]. A missing tag or ref is not an
/// error: it is reported as `false` or `None`. `Err` is reserved for backend
/// failures, which the callers in this crate degrade to "not found".
pub trait TagBackend {
    /// Whether the repository holds any tag at all
    ///
    /// Cheap check used to skip enumeration on repositories without tags.
    fn has_tags(&self) -> Result<bool>;

    /// Whether a tag with exactly this name exists
    fn tag_exists(&self, tag: &str) -> Result<bool>;

    /// List tags matching a glob such as `v*`
    ///
    /// Implementations should return candidates in descending version order
    /// when they can; callers treat the order as a hint only.
    ///
    /// # Example
    /// ```rust
    /// # use tag_publish::git::TagBackend;
    /// # fn example<B: TagBackend>(backend: &B) -> tag_publish::Result<()> {
    /// for tag in backend.list_tags("v*")? {
    ///     println!("candidate: {}", tag);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    fn list_tags(&self, glob: &str) -> Result<Vec<String>>;

    /// Resolve a branch, remote-tracking branch or tag name to a commit
    ///
    /// # Returns
    /// * `Ok(Some(Oid))` - The commit the name points at (annotated tags are peeled)
    /// * `Ok(None)` - If the name does not resolve
    /// * `Err` - If the backend failed
    fn resolve_commit(&self, name: &str) -> Result<Option<Oid>>;

    /// Whether `ancestor` is reachable by following parent links from `descendant`
    ///
    /// A commit counts as its own ancestor.
    fn is_ancestor(&self, ancestor: Oid, descendant: Oid) -> Result<bool>;
}

/// Full repository interface used by the publish workflow
pub trait Repository: TagBackend {
    /// Local branch names
    fn local_branches(&self) -> Result<Vec<String>>;

    /// Remote-tracking branch names, e.g. `origin/main`
    fn remote_branches(&self) -> Result<Vec<String>>;

    /// Configured remotes, `origin` first and the rest alphabetically
    fn remotes(&self) -> Result<Vec<RemoteInfo>>;

    /// Create a lightweight tag pointing at `commit`
    ///
    /// # Returns
    /// * `Ok(())` - Success
    /// * `Err` - If the tag already exists or the commit is unknown
    fn create_tag(&self, name: &str, commit: Oid) -> Result<()>;

    /// Push a single tag to a remote
    fn push_tag(&self, remote: &str, tag: &str) -> Result<()>;

    /// Refresh remote-tracking branches and tags, giving up after `timeout`
    ///
    /// # Returns
    /// * `Ok(FetchOutcome::Completed)` - Fetch finished in time
    /// * `Ok(FetchOutcome::TimedOut)` - Deadline elapsed; the fetch is abandoned
    /// * `Err` - If the remote is unknown or the fetch failed
    fn fetch(&self, remote: &str, timeout: Duration) -> Result<FetchOutcome>;
}
