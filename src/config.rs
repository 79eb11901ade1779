use crate::error::{Result, TagPublishError};
use crate::resolver::ResolveStrategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "tagpublish.toml";

/// Represents the complete configuration for tag-publish.
///
/// Contains the branch to tag-format mapping and behavior options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default, alias = "branchTags")]
    pub branch_tags: Vec<BranchTagConfig>,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

/// A branch and the tag format used for it, e.g. `gray` -> `g0.0.0`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct BranchTagConfig {
    pub branch: String,
    pub tag: String,
}

impl BranchTagConfig {
    pub fn new(branch: impl Into<String>, tag: impl Into<String>) -> Self {
        BranchTagConfig {
            branch: branch.into(),
            tag: tag.into(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    5
}

/// Configuration for behavior customization.
///
/// Controls runtime behavior of tag-publish without affecting version arithmetic.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BehaviorConfig {
    /// Remote used for fetching and for resolving branches missing locally
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default)]
    pub resolve_strategy: ResolveStrategy,

    /// Push to `remote` without asking when several remotes exist
    #[serde(default)]
    pub skip_remote_selection: bool,
}

impl BehaviorConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            remote: default_remote(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            resolve_strategy: ResolveStrategy::default(),
            skip_remote_selection: false,
        }
    }
}

/// Returns the default branch to tag-format mapping.
fn default_branch_tags() -> Vec<BranchTagConfig> {
    vec![
        BranchTagConfig::new("master", "v0.0.0"),
        BranchTagConfig::new("main", "v0.0.0"),
        BranchTagConfig::new("gray", "g0.0.0"),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Config {
            branch_tags: default_branch_tags(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl Config {
    /// Tag format configured for `branch`
    pub fn tag_format_for(&self, branch: &str) -> Option<&str> {
        self.branch_tags
            .iter()
            .find(|bt| bt.branch == branch)
            .map(|bt| bt.tag.as_str())
    }

    /// Parse a configuration document.
    ///
    /// A document without branch tags gets the default branch list.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        if config.branch_tags.is_empty() {
            config.branch_tags = default_branch_tags();
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for bt in &self.branch_tags {
            if bt.branch.trim().is_empty() {
                return Err(TagPublishError::config("branch name must not be empty"));
            }
            if bt.tag.trim().is_empty() {
                return Err(TagPublishError::config(format!(
                    "tag format for branch '{}' must not be empty",
                    bt.branch
                )));
            }
        }
        if self.behavior.remote.trim().is_empty() {
            return Err(TagPublishError::config("behavior.remote must not be empty"));
        }
        if self.behavior.fetch_timeout_secs == 0 {
            return Err(TagPublishError::config(
                "behavior.fetch_timeout_secs must be at least 1; use --no-fetch to skip fetching",
            ));
        }
        Ok(())
    }
}

/// Where configuration is looked up when no explicit path is given
fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".").join(CONFIG_FILE_NAME)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(format!(".{}", CONFIG_FILE_NAME)));
    }
    paths
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `tagpublish.toml` in current directory
/// 3. `.tagpublish.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    if let Some(path) = config_path {
        let content = fs::read_to_string(path).map_err(|e| {
            TagPublishError::config(format!("Cannot read config file '{}': {}", path, e))
        })?;
        return Config::from_toml(&content);
    }

    for path in default_config_paths() {
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading configuration");
            return Config::from_toml(&fs::read_to_string(&path)?);
        }
    }

    Ok(Config::default())
}

/// Writes the default configuration to `path`, refusing to overwrite a file.
pub fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(TagPublishError::config(format!(
            "'{}' already exists",
            path.display()
        )));
    }
    let content = toml::to_string_pretty(&Config::default())?;
    fs::write(path, content)?;
    Ok(())
}
