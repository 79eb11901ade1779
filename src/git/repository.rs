use crate::domain::ranking::sort_tags_descending;
use crate::error::{Result, TagPublishError};
use crate::git::{FetchOutcome, RemoteInfo, Repository, TagBackend};
use git2::{BranchType, ErrorCode, Oid, Repository as Git2Repo};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Path to the `.git` directory
    pub fn git_dir(&self) -> PathBuf {
        self.repo.path().to_path_buf()
    }

    fn branch_names(&self, branch_type: BranchType) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for branch in self.repo.branches(Some(branch_type))? {
            let (branch, _) = branch?;
            if let Some(name) = branch.name()? {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}

/// Credentials callbacks shared by fetch and push.
///
/// Tries SSH keys from `~/.ssh` in order of preference, then the SSH agent,
/// then git's default credentials.
fn remote_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        git2::Cred::default()
    });
    callbacks
}

/// Fetch remote branches, then tags if the repository has any.
///
/// Runs on its own repository handle so it can be moved to a worker thread.
fn fetch_blocking(git_dir: &Path, remote_name: &str) -> Result<()> {
    let repo = Git2Repo::open(git_dir)?;
    let mut remote = repo
        .find_remote(remote_name)
        .map_err(|e| TagPublishError::remote(format!("Cannot find remote: {}", e)))?;

    let heads = format!("+refs/heads/*:refs/remotes/{}/*", remote_name);
    let mut options = git2::FetchOptions::new();
    options.remote_callbacks(remote_callbacks());
    options.download_tags(git2::AutotagOption::None);
    remote
        .fetch(&[heads.as_str()], Some(&mut options), None)
        .map_err(|e| TagPublishError::remote(format!("Fetch failed: {}", e)))?;

    if !repo.tag_names(None)?.is_empty() {
        let mut options = git2::FetchOptions::new();
        options.remote_callbacks(remote_callbacks());
        remote
            .fetch(&["+refs/tags/*:refs/tags/*"], Some(&mut options), None)
            .map_err(|e| TagPublishError::remote(format!("Tag fetch failed: {}", e)))?;
    }

    Ok(())
}

impl TagBackend for Git2Repository {
    fn has_tags(&self) -> Result<bool> {
        Ok(!self.repo.tag_names(None)?.is_empty())
    }

    fn tag_exists(&self, tag: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", tag)) {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::InvalidSpec) => {
                Ok(false)
            }
            Err(e) => Err(TagPublishError::tag(format!(
                "Cannot find tag '{}': {}",
                tag, e
            ))),
        }
    }

    fn list_tags(&self, glob: &str) -> Result<Vec<String>> {
        let names = self.repo.tag_names(Some(glob))?;
        let mut tags: Vec<String> = names.iter().flatten().map(|s| s.to_string()).collect();

        // Same order as `git tag --sort=-v:refname`: highest version first
        let prefix = glob.strip_suffix('*').unwrap_or(glob);
        sort_tags_descending(&mut tags, prefix);
        debug!(glob, count = tags.len(), "listed candidate tags");
        Ok(tags)
    }

    fn resolve_commit(&self, name: &str) -> Result<Option<Oid>> {
        let object = match self.repo.revparse_single(name) {
            Ok(object) => object,
            Err(e)
                if matches!(
                    e.code(),
                    ErrorCode::NotFound | ErrorCode::InvalidSpec | ErrorCode::Ambiguous
                ) =>
            {
                return Ok(None)
            }
            Err(e) => return Err(e.into()),
        };

        let commit = object.peel_to_commit()?;
        Ok(Some(commit.id()))
    }

    fn is_ancestor(&self, ancestor: Oid, descendant: Oid) -> Result<bool> {
        if ancestor == descendant {
            return Ok(true);
        }
        Ok(self.repo.graph_descendant_of(descendant, ancestor)?)
    }
}

impl Repository for Git2Repository {
    fn local_branches(&self) -> Result<Vec<String>> {
        self.branch_names(BranchType::Local)
    }

    fn remote_branches(&self) -> Result<Vec<String>> {
        Ok(self
            .branch_names(BranchType::Remote)?
            .into_iter()
            .filter(|name| !name.ends_with("/HEAD"))
            .collect())
    }

    fn remotes(&self) -> Result<Vec<RemoteInfo>> {
        let names = self.repo.remotes()?;
        let mut remotes = Vec::new();

        for name in names.iter().flatten() {
            let remote = self.repo.find_remote(name)?;
            let url = remote.url().unwrap_or_default().to_string();
            remotes.push(RemoteInfo::new(name, url));
        }

        // "origin" first, then alphabetical
        remotes.sort_by(|a, b| {
            (a.name != "origin", a.name.as_str()).cmp(&(b.name != "origin", b.name.as_str()))
        });

        Ok(remotes)
    }

    fn create_tag(&self, name: &str, commit: Oid) -> Result<()> {
        let object = self
            .repo
            .find_object(commit, None)
            .map_err(|e| TagPublishError::tag(format!("Cannot find object: {}", e)))?;

        self.repo
            .tag_lightweight(name, &object, false)
            .map_err(|e| TagPublishError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        Ok(())
    }

    fn push_tag(&self, remote_name: &str, tag: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|_| {
            TagPublishError::remote(format!("No remote named '{}' found", remote_name))
        })?;

        let mut callbacks = remote_callbacks();
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "Remote rejected {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/tags/{}:refs/tags/{}", tag, tag);
        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| match e.class() {
                git2::ErrorClass::Net => {
                    TagPublishError::remote(format!("Network error during push: {}", e))
                }
                _ => TagPublishError::remote(format!("Failed to push tag '{}': {}", tag, e)),
            })
    }

    fn fetch(&self, remote: &str, timeout: Duration) -> Result<FetchOutcome> {
        let git_dir = self.git_dir();
        let remote_name = remote.to_string();
        let (tx, rx) = mpsc::channel();

        // The worker is detached on timeout; its result is dropped with the channel
        thread::spawn(move || {
            let _ = tx.send(fetch_blocking(&git_dir, &remote_name));
        });

        match rx.recv_timeout(timeout) {
            Ok(result) => result.map(|_| FetchOutcome::Completed),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(FetchOutcome::TimedOut),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(TagPublishError::remote(
                "Fetch worker exited without reporting a result",
            )),
        }
    }
}
