use crate::error::{Result, TagPublishError};
use crate::git::{FetchOutcome, RemoteInfo, Repository, TagBackend};
use git2::Oid;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::time::Duration;

/// In-memory repository for testing without actual git operations
///
/// Holds a commit graph with parent links, branch refs (remote-tracking refs
/// are written as `<remote>/<branch>`), tags in insertion order and a log of
/// every backend call. `list_tags` returns tags in insertion order, so tests
/// decide whether candidates arrive sorted.
pub struct MockRepository {
    parents: RefCell<HashMap<Oid, Vec<Oid>>>,
    branches: RefCell<BTreeMap<String, Oid>>,
    tags: RefCell<Vec<(String, Oid)>>,
    remotes: RefCell<Vec<RemoteInfo>>,
    failing: RefCell<HashSet<String>>,
    pushed: RefCell<Vec<(String, String)>>,
    fetch_outcome: Cell<FetchOutcome>,
    calls: RefCell<Vec<String>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            parents: RefCell::new(HashMap::new()),
            branches: RefCell::new(BTreeMap::new()),
            tags: RefCell::new(Vec::new()),
            remotes: RefCell::new(Vec::new()),
            failing: RefCell::new(HashSet::new()),
            pushed: RefCell::new(Vec::new()),
            fetch_outcome: Cell::new(FetchOutcome::Completed),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Add a commit with its parents
    pub fn add_commit(&self, oid: Oid, parents: &[Oid]) {
        self.parents.borrow_mut().insert(oid, parents.to_vec());
    }

    /// Add a tag pointing to an OID
    pub fn add_tag(&self, name: impl Into<String>, oid: Oid) {
        self.tags.borrow_mut().push((name.into(), oid));
    }

    /// Set a branch head; use `origin/<name>` for a remote-tracking branch
    pub fn set_branch_head(&self, branch: impl Into<String>, oid: Oid) {
        self.branches.borrow_mut().insert(branch.into(), oid);
    }

    /// Register a remote
    pub fn add_remote(&self, name: impl Into<String>, url: impl Into<String>) {
        self.remotes.borrow_mut().push(RemoteInfo::new(name, url));
    }

    /// Make every query that names `name` fail with a backend error
    pub fn fail_queries_for(&self, name: impl Into<String>) {
        self.failing.borrow_mut().insert(name.into());
    }

    /// Outcome returned by the next fetches
    pub fn set_fetch_outcome(&self, outcome: FetchOutcome) {
        self.fetch_outcome.set(outcome);
    }

    /// Commit a tag points at, if it exists
    pub fn tag_target(&self, name: &str) -> Option<Oid> {
        self.tags
            .borrow()
            .iter()
            .find(|(tag, _)| tag == name)
            .map(|(_, oid)| *oid)
    }

    /// `(remote, tag)` pairs pushed so far
    pub fn pushed(&self) -> Vec<(String, String)> {
        self.pushed.borrow().clone()
    }

    /// Names of the backend methods called so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: &str) {
        self.calls.borrow_mut().push(call.to_string());
    }

    fn check_failure(&self, name: &str) -> Result<()> {
        if self.failing.borrow().contains(name) {
            return Err(TagPublishError::Git(git2::Error::from_str(&format!(
                "simulated failure for '{}'",
                name
            ))));
        }
        Ok(())
    }

    fn is_remote_tracking(&self, branch: &str) -> bool {
        self.remotes.borrow().iter().any(|remote| {
            branch
                .strip_prefix(remote.name.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn glob_matches(glob: &str, name: &str) -> bool {
    match glob.strip_suffix('*') {
        Some(prefix) => name.starts_with(prefix),
        None => name == glob,
    }
}

impl TagBackend for MockRepository {
    fn has_tags(&self) -> Result<bool> {
        self.record("has_tags");
        Ok(!self.tags.borrow().is_empty())
    }

    fn tag_exists(&self, tag: &str) -> Result<bool> {
        self.record("tag_exists");
        self.check_failure(tag)?;
        Ok(self.tag_target(tag).is_some())
    }

    fn list_tags(&self, glob: &str) -> Result<Vec<String>> {
        self.record("list_tags");
        self.check_failure(glob)?;
        Ok(self
            .tags
            .borrow()
            .iter()
            .filter(|(name, _)| glob_matches(glob, name))
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn resolve_commit(&self, name: &str) -> Result<Option<Oid>> {
        self.record("resolve_commit");
        self.check_failure(name)?;
        // Tags shadow branches, as in git's ref lookup order
        if let Some(oid) = self.tag_target(name) {
            return Ok(Some(oid));
        }
        Ok(self.branches.borrow().get(name).copied())
    }

    fn is_ancestor(&self, ancestor: Oid, descendant: Oid) -> Result<bool> {
        self.record("is_ancestor");
        let parents = self.parents.borrow();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([descendant]);

        while let Some(oid) = queue.pop_front() {
            if oid == ancestor {
                return Ok(true);
            }
            if !seen.insert(oid) {
                continue;
            }
            if let Some(next) = parents.get(&oid) {
                queue.extend(next.iter().copied());
            }
        }
        Ok(false)
    }
}

impl Repository for MockRepository {
    fn local_branches(&self) -> Result<Vec<String>> {
        self.record("local_branches");
        Ok(self
            .branches
            .borrow()
            .keys()
            .filter(|name| !self.is_remote_tracking(name))
            .cloned()
            .collect())
    }

    fn remote_branches(&self) -> Result<Vec<String>> {
        self.record("remote_branches");
        Ok(self
            .branches
            .borrow()
            .keys()
            .filter(|name| self.is_remote_tracking(name))
            .cloned()
            .collect())
    }

    fn remotes(&self) -> Result<Vec<RemoteInfo>> {
        self.record("remotes");
        Ok(self.remotes.borrow().clone())
    }

    fn create_tag(&self, name: &str, commit: Oid) -> Result<()> {
        self.record("create_tag");
        if self.tag_target(name).is_some() {
            return Err(TagPublishError::tag(format!("Tag '{}' already exists", name)));
        }
        if !self.parents.borrow().contains_key(&commit) {
            return Err(TagPublishError::tag(format!("Unknown commit {}", commit)));
        }
        self.add_tag(name, commit);
        Ok(())
    }

    fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        self.record("push_tag");
        self.check_failure(remote)?;
        if !self.remotes.borrow().iter().any(|r| r.name == remote) {
            return Err(TagPublishError::remote(format!(
                "No remote named '{}' found",
                remote
            )));
        }
        self.pushed
            .borrow_mut()
            .push((remote.to_string(), tag.to_string()));
        Ok(())
    }

    fn fetch(&self, remote: &str, _timeout: Duration) -> Result<FetchOutcome> {
        self.record("fetch");
        self.check_failure(remote)?;
        Ok(self.fetch_outcome.get())
    }
}
