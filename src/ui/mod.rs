//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - The [`Prompter`] seam and its terminal implementation

use std::io::{self, BufRead, Write};

use anyhow::Result;
use console::style;

use crate::boundary::TagRejection;
use crate::git::RemoteInfo;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_available_branches, display_boundary_warning, display_error,
    display_manual_push_instruction, display_status, display_success, display_suggestion,
    display_tag_rejection,
};

/// A branch offered for tagging, with its last tag if one was found
#[derive(Debug, Clone, PartialEq)]
pub struct BranchChoice {
    pub branch: String,
    pub format: String,
    pub last_tag: Option<String>,
}

/// Interactive decisions the publish workflow asks for.
///
/// Indices returned by the selection methods are 0-based positions in the
/// slice that was passed in.
pub trait Prompter {
    /// Pick the branch to tag
    fn select_branch(&mut self, choices: &[BranchChoice]) -> Result<usize>;

    /// Read a tag; an empty answer means "use the suggestion"
    fn read_tag(&mut self, format: &str, suggested: &str) -> Result<String>;

    /// Report that the last answer to [`Prompter::read_tag`] was refused
    fn reject_tag(&mut self, rejection: &TagRejection);

    /// Ask whether the new tag should be pushed
    fn confirm_push(&mut self) -> Result<bool>;

    /// Pick the remote to push to
    fn select_remote(&mut self, remotes: &[RemoteInfo]) -> Result<usize>;
}

/// [`Prompter`] reading answers from stdin
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        TerminalPrompter
    }
}

fn read_answer(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        return Err(anyhow::anyhow!("Input closed before an answer was given"));
    }
    Ok(input.trim().to_string())
}

/// Parse a 1-based menu answer; empty selects the first entry
fn parse_selection(input: &str, len: usize) -> Option<usize> {
    if input.is_empty() {
        return Some(0);
    }
    match input.parse::<usize>() {
        Ok(n) if n >= 1 && n <= len => Some(n - 1),
        _ => None,
    }
}

/// Yes/no answer where an empty answer means yes
fn parse_default_yes(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "" | "y" | "yes")
}

impl Prompter for TerminalPrompter {
    fn select_branch(&mut self, choices: &[BranchChoice]) -> Result<usize> {
        let default = &choices
            .first()
            .ok_or_else(|| anyhow::anyhow!("No branches available to select"))?
            .branch;
        if choices.len() == 1 {
            return Ok(0);
        }

        println!("\n{}", style("Select branch for tagging:").bold());
        for (i, choice) in choices.iter().enumerate() {
            println!("  {}", formatter::format_branch_choice(i, choice));
        }

        let input = read_answer(&format!("Enter number (default: 1 for {}): ", default))?;
        Ok(parse_selection(&input, choices.len()).unwrap_or_else(|| {
            display_status(&format!(
                "Invalid selection, using default branch: {}",
                default
            ));
            0
        }))
    }

    fn read_tag(&mut self, format: &str, suggested: &str) -> Result<String> {
        println!(
            "Enter tag (format: {}, default: {}):",
            format,
            style(suggested).green()
        );
        read_answer("> ")
    }

    fn reject_tag(&mut self, rejection: &TagRejection) {
        display_tag_rejection(rejection);
    }

    fn confirm_push(&mut self) -> Result<bool> {
        let input = read_answer("Do you want to push tag to remote? (Y/n): ")?;
        Ok(parse_default_yes(&input))
    }

    fn select_remote(&mut self, remotes: &[RemoteInfo]) -> Result<usize> {
        let default = &remotes
            .first()
            .ok_or_else(|| anyhow::anyhow!("No remotes available to select"))?
            .name;

        println!("Select remote to push to:");
        for (i, remote) in remotes.iter().enumerate() {
            println!("  {}: {} ({})", i + 1, remote.name, remote.url);
        }

        let input = read_answer(&format!("Enter number (default: 1 for {}): ", default))?;
        Ok(parse_selection(&input, remotes.len()).unwrap_or_else(|| {
            display_status(&format!(
                "Invalid selection, using default remote: {}",
                default
            ));
            0
        }))
    }
}
