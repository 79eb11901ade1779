use thiserror::Error;

/// Unified error type for tag-publish operations
#[derive(Error, Debug)]
pub enum TagPublishError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Branch error: {0}")]
    Branch(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Cannot serialize configuration: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Convenience type alias for Results in tag-publish
pub type Result<T> = std::result::Result<T, TagPublishError>;

impl TagPublishError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        TagPublishError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        TagPublishError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        TagPublishError::Tag(msg.into())
    }

    /// Create a branch error with context
    pub fn branch(msg: impl Into<String>) -> Self {
        TagPublishError::Branch(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        TagPublishError::Remote(msg.into())
    }
}
