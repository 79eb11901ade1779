use std::fmt;

/// Warnings raised while preparing a tag near repository boundaries.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// A configured branch exists neither locally nor on the remote
    BranchMissing { branch: String },
    /// Fetch did not finish before the deadline; local data is used
    FetchTimedOut { remote: String, seconds: u64 },
    /// Fetch failed; local data is used
    FetchFailed { remote: String, reason: String },
    /// The repository has no remotes, so the tag stays local
    NoRemotes,
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::BranchMissing { branch } => write!(
                f,
                "Branch '{}' does not exist in this repository and will be skipped",
                branch
            ),
            BoundaryWarning::FetchTimedOut { remote, seconds } => write!(
                f,
                "Fetch from '{}' taking longer than {}s, continuing with local data",
                remote, seconds
            ),
            BoundaryWarning::FetchFailed { remote, reason } => write!(
                f,
                "Could not fetch from '{}': {}. Using local branch data",
                remote, reason
            ),
            BoundaryWarning::NoRemotes => {
                write!(f, "No remote repositories found, the tag will not be pushed")
            }
        }
    }
}

/// Why an entered tag was refused
#[derive(Debug, Clone, PartialEq)]
pub enum TagRejection {
    /// Tag does not match `<prefix>N.N.N`
    FormatMismatch { tag: String, format: String },
    /// Tag is not higher than the branch's last tag
    NotGreater { tag: String, last_tag: String },
    /// A tag with this name already exists
    AlreadyExists { tag: String },
}

impl fmt::Display for TagRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagRejection::FormatMismatch { tag, format } => {
                write!(f, "Invalid format '{}': tag should match {}", tag, format)
            }
            TagRejection::NotGreater { tag, last_tag } => write!(
                f,
                "New tag '{}' must be greater than the last tag: {}",
                tag, last_tag
            ),
            TagRejection::AlreadyExists { tag } => write!(f, "Tag '{}' already exists", tag),
        }
    }
}
