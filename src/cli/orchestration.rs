//! Main workflow orchestration logic
//!
//! This module contains the publish workflow driven by `main.rs`. It is
//! generic over the [`Repository`] and the [`Prompter`], so it can run
//! against an in-memory repository with scripted answers.

use std::collections::HashSet;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::boundary::{BoundaryWarning, TagRejection};
use crate::config::{BranchTagConfig, Config};
use crate::domain::{is_greater, BranchRef, TagFormat};
use crate::error::TagPublishError;
use crate::git::ancestry::resolve_branch;
use crate::git::{FetchOutcome, RemoteInfo, Repository};
use crate::planner::plan_next;
use crate::resolver::TagResolver;
use crate::ui::{self, BranchChoice, Prompter};

/// Arguments for the publish workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// This decoupling allows the workflow to be called programmatically
/// without depending on clap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishWorkflowArgs {
    /// Explicitly specified branch to tag
    pub branch: Option<String>,

    /// Explicitly specified tag; skips the tag prompt
    pub tag: Option<String>,

    /// Skip confirmation prompts: accept the suggestion and push
    pub force: bool,

    /// Preview mode - don't create tags or push
    pub dry_run: bool,

    /// Never push, even when remotes exist
    pub no_push: bool,

    /// Don't refresh remote data before resolving tags
    pub no_fetch: bool,
}

/// Result of a successful publish workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The tag that was created (or would be, in a dry run)
    pub tag: String,

    /// The branch that was tagged
    pub branch: String,

    /// Last tag found on the branch before this run
    pub last_tag: Option<String>,

    /// Whether the tag was created
    pub created: bool,

    /// Remote the tag was pushed to
    pub pushed_to: Option<String>,

    /// Non-fatal issues met along the way
    pub warnings: Vec<BoundaryWarning>,
}

fn warn_user(warnings: &mut Vec<BoundaryWarning>, warning: BoundaryWarning) {
    ui::display_boundary_warning(&warning);
    warnings.push(warning);
}

/// Refresh remote data, tolerating timeouts and failures
fn refresh_remote<R: Repository + ?Sized>(
    repo: &R,
    remotes: &[RemoteInfo],
    config: &Config,
    warnings: &mut Vec<BoundaryWarning>,
) {
    let remote = &config.behavior.remote;
    if !remotes.iter().any(|r| &r.name == remote) {
        warn_user(
            warnings,
            BoundaryWarning::FetchFailed {
                remote: remote.clone(),
                reason: "remote is not configured in this repository".to_string(),
            },
        );
        return;
    }

    ui::display_status("Fetching branch information from remote, please wait...");
    match repo.fetch(remote, config.behavior.fetch_timeout()) {
        Ok(FetchOutcome::Completed) => {
            ui::display_success("Remote information fetched successfully.")
        }
        Ok(FetchOutcome::TimedOut) => warn_user(
            warnings,
            BoundaryWarning::FetchTimedOut {
                remote: remote.clone(),
                seconds: config.behavior.fetch_timeout_secs,
            },
        ),
        Err(e) => warn_user(
            warnings,
            BoundaryWarning::FetchFailed {
                remote: remote.clone(),
                reason: e.to_string(),
            },
        ),
    }
}

/// Configured branches that exist locally or as `<remote>/<branch>`.
///
/// Every configured branch that is missing yields a
/// [`BoundaryWarning::BranchMissing`].
pub fn available_branch_tags<R: Repository + ?Sized>(
    repo: &R,
    config: &Config,
    warnings: &mut Vec<BoundaryWarning>,
) -> Vec<BranchTagConfig> {
    let remote = &config.behavior.remote;
    let mut existing: HashSet<String> = repo
        .local_branches()
        .unwrap_or_else(|e| {
            warn!(error = %e, "cannot list local branches");
            Vec::new()
        })
        .into_iter()
        .collect();

    match repo.remote_branches() {
        Ok(names) => existing.extend(
            names
                .iter()
                .filter_map(|name| BranchRef::from_remote_tracking(name, remote))
                .map(|branch| branch.name),
        ),
        Err(e) => warn!(error = %e, "cannot list remote branches"),
    }

    let mut available = Vec::new();
    for bt in &config.branch_tags {
        if existing.contains(&bt.branch) {
            available.push(bt.clone());
        } else {
            warn_user(
                warnings,
                BoundaryWarning::BranchMissing {
                    branch: bt.branch.clone(),
                },
            );
        }
    }
    available
}

/// Check an entered tag against the format, the last tag and existing tags
pub fn validate_new_tag<R: Repository + ?Sized>(
    repo: &R,
    tag: &str,
    format: &TagFormat,
    last_tag: Option<&str>,
) -> std::result::Result<(), TagRejection> {
    if !format.matches(tag) {
        return Err(TagRejection::FormatMismatch {
            tag: tag.to_string(),
            format: format.template().to_string(),
        });
    }

    if let Some(last) = last_tag {
        if !is_greater(tag, Some(last)) {
            return Err(TagRejection::NotGreater {
                tag: tag.to_string(),
                last_tag: last.to_string(),
            });
        }
    }

    if repo.tag_exists(tag).unwrap_or(false) {
        return Err(TagRejection::AlreadyExists {
            tag: tag.to_string(),
        });
    }

    Ok(())
}

fn choose_branch<P: Prompter + ?Sized>(
    prompter: &mut P,
    requested: Option<&str>,
    choices: Vec<BranchChoice>,
) -> Result<BranchChoice> {
    if let Some(branch) = requested {
        return choices
            .into_iter()
            .find(|choice| choice.branch == branch)
            .ok_or_else(|| {
                TagPublishError::branch(format!(
                    "'{}' is not configured for tagging or does not exist",
                    branch
                ))
                .into()
            });
    }

    let index = prompter.select_branch(&choices)?;
    choices
        .into_iter()
        .nth(index)
        .ok_or_else(|| anyhow::anyhow!("Invalid branch selection"))
}

fn choose_tag<R: Repository + ?Sized, P: Prompter + ?Sized>(
    repo: &R,
    prompter: &mut P,
    args: &PublishWorkflowArgs,
    format: &TagFormat,
    suggested: &str,
    last_tag: Option<&str>,
) -> Result<String> {
    let fixed = match &args.tag {
        Some(tag) => Some(tag.clone()),
        None if args.force || args.dry_run => Some(suggested.to_string()),
        None => None,
    };

    if let Some(tag) = fixed {
        validate_new_tag(repo, &tag, format, last_tag).map_err(|r| anyhow::anyhow!("{}", r))?;
        return Ok(tag);
    }

    loop {
        let input = prompter.read_tag(format.template(), suggested)?;
        let tag = if input.is_empty() {
            suggested.to_string()
        } else {
            input
        };
        match validate_new_tag(repo, &tag, format, last_tag) {
            Ok(()) => {
                ui::display_success(&format!("Valid tag: {}", tag));
                return Ok(tag);
            }
            Err(rejection) => prompter.reject_tag(&rejection),
        }
    }
}

/// The configured remote if present, else the first one
fn preferred_remote<'r>(remotes: &'r [RemoteInfo], config: &Config) -> &'r RemoteInfo {
    remotes
        .iter()
        .find(|r| r.name == config.behavior.remote)
        .unwrap_or(&remotes[0])
}

fn choose_push_remote<P: Prompter + ?Sized>(
    prompter: &mut P,
    remotes: &[RemoteInfo],
    config: &Config,
    args: &PublishWorkflowArgs,
) -> Result<Option<String>> {
    if remotes.is_empty() || args.no_push {
        return Ok(None);
    }
    if args.force || args.dry_run {
        return Ok(Some(preferred_remote(remotes, config).name.clone()));
    }
    if !prompter.confirm_push()? {
        return Ok(None);
    }
    if remotes.len() == 1 || config.behavior.skip_remote_selection {
        return Ok(Some(preferred_remote(remotes, config).name.clone()));
    }

    let index = prompter.select_remote(remotes)?;
    remotes
        .get(index)
        .map(|r| Some(r.name.clone()))
        .ok_or_else(|| anyhow::anyhow!("Invalid remote selection"))
}

/// Main publish workflow
///
/// Orchestrates the entire tagging process:
/// 1. Refresh remote data (bounded by the configured timeout)
/// 2. Keep configured branches that exist
/// 3. Select the branch, showing each branch's last tag
/// 4. Suggest and validate the new tag
/// 5. Decide whether and where to push
/// 6. Create the tag on the branch tip and push it
///
/// # Arguments
///
/// * `repo` - Repository to read from and tag
/// * `prompter` - Source of interactive answers
/// * `config` - Branch formats and behavior options
/// * `args` - Workflow arguments (branch, tag, force, dry_run, ...)
///
/// # Returns
///
/// Result containing the created tag info or error
pub fn run_publish_workflow<R: Repository + ?Sized, P: Prompter + ?Sized>(
    repo: &R,
    prompter: &mut P,
    config: &Config,
    args: &PublishWorkflowArgs,
) -> Result<WorkflowResult> {
    let mut warnings = Vec::new();
    let remotes = repo.remotes().context("Cannot list remotes")?;

    if remotes.is_empty() {
        warn_user(&mut warnings, BoundaryWarning::NoRemotes);
    } else if !args.no_fetch {
        refresh_remote(repo, &remotes, config, &mut warnings);
    }

    ui::display_status("Finding available branches...");
    let branch_tags = available_branch_tags(repo, config, &mut warnings);
    if branch_tags.is_empty() {
        anyhow::bail!("None of the configured branches exist in this repository");
    }

    let resolver = TagResolver::new(repo, &config.behavior.remote)
        .with_strategy(config.behavior.resolve_strategy);
    let choices: Vec<BranchChoice> = branch_tags
        .iter()
        .map(|bt| BranchChoice {
            branch: bt.branch.clone(),
            format: bt.tag.clone(),
            last_tag: resolver.resolve_last(&bt.branch, &bt.tag),
        })
        .collect();

    let selected = choose_branch(prompter, args.branch.as_deref(), choices)?;
    debug!(branch = %selected.branch, last_tag = ?selected.last_tag, "branch selected");

    let format = TagFormat::new(selected.format.as_str());
    let last_tag = selected.last_tag.as_deref();
    let suggested = plan_next(last_tag, format.template());
    ui::display_suggestion(last_tag, &suggested);

    let tag = choose_tag(repo, prompter, args, &format, &suggested, last_tag)?;
    let push_remote = choose_push_remote(prompter, &remotes, config, args)?;

    let mut result = WorkflowResult {
        tag: tag.clone(),
        branch: selected.branch.clone(),
        last_tag: selected.last_tag.clone(),
        created: false,
        pushed_to: None,
        warnings,
    };

    if args.dry_run {
        for step in ui::formatter::format_dry_run(&tag, &selected.branch, push_remote.as_deref())
        {
            ui::display_status(&step);
        }
        return Ok(result);
    }

    let commit = resolve_branch(repo, &selected.branch, &config.behavior.remote)
        .ok_or_else(|| {
            TagPublishError::branch(format!("Cannot resolve '{}' to a commit", selected.branch))
        })?;
    repo.create_tag(&tag, commit)
        .with_context(|| format!("Failed to create tag '{}'", tag))?;
    result.created = true;

    match push_remote {
        Some(remote) => {
            ui::display_status(&format!("Pushing tag {} to remote {}...", tag, remote));
            if let Err(e) = repo.push_tag(&remote, &tag) {
                ui::display_manual_push_instruction(&tag, &remote);
                return Err(e).with_context(|| format!("Failed to push tag '{}'", tag));
            }
            ui::display_success(&format!(
                "Successfully created tag {} on branch {}",
                tag, selected.branch
            ));
            ui::display_success(&format!("Tag was pushed to remote: {}", remote));
            result.pushed_to = Some(remote);
        }
        None => {
            ui::display_success(&format!(
                "Successfully created tag {} on branch {}",
                tag, selected.branch
            ));
            if !remotes.is_empty() {
                ui::display_manual_push_instruction(&tag, &preferred_remote(&remotes, config).name);
            }
        }
    }

    Ok(result)
}
