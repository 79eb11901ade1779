/// A configured branch name and the refs it may resolve through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    pub name: String,
}

impl BranchRef {
    /// Create a new branch reference
    pub fn new(name: impl Into<String>) -> Self {
        BranchRef { name: name.into() }
    }

    /// Remote-tracking name for this branch, e.g. `origin/main`.
    pub fn remote_tracking_name(&self, remote: &str) -> String {
        format!("{}/{}", remote, self.name)
    }

    /// Names to try when resolving the branch tip: local first, then remote-tracking.
    pub fn resolution_order(&self, remote: &str) -> [String; 2] {
        [self.name.clone(), self.remote_tracking_name(remote)]
    }

    /// Strip the remote from a remote-tracking branch name.
    ///
    /// `origin/release/1.x` becomes `release/1.x`; names on other remotes and
    /// the symbolic `HEAD` yield `None`.
    pub fn from_remote_tracking(full_name: &str, remote: &str) -> Option<Self> {
        let name = full_name.strip_prefix(remote)?.strip_prefix('/')?;
        if name.is_empty() || name == "HEAD" {
            return None;
        }
        Some(BranchRef::new(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_order() {
        let branch = BranchRef::new("gray");
        assert_eq!(
            branch.resolution_order("origin"),
            ["gray".to_string(), "origin/gray".to_string()]
        );
    }

    #[test]
    fn test_from_remote_tracking() {
        assert_eq!(
            BranchRef::from_remote_tracking("origin/main", "origin"),
            Some(BranchRef::new("main"))
        );
        assert_eq!(
            BranchRef::from_remote_tracking("origin/release/1.x", "origin"),
            Some(BranchRef::new("release/1.x"))
        );
    }

    #[test]
    fn test_from_remote_tracking_rejects_other_remotes() {
        assert_eq!(BranchRef::from_remote_tracking("upstream/main", "origin"), None);
        assert_eq!(BranchRef::from_remote_tracking("originx/main", "origin"), None);
        assert_eq!(BranchRef::from_remote_tracking("origin/HEAD", "origin"), None);
    }
}
