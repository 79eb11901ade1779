//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! `format_*` functions build strings and are testable; `display_*` functions print them.

use console::style;

use crate::boundary::{BoundaryWarning, TagRejection};
use crate::config::BranchTagConfig;
use crate::ui::BranchChoice;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display why an entered tag was refused.
pub fn display_tag_rejection(rejection: &TagRejection) {
    eprintln!("{} {}", style("Error:").red(), rejection);
}

/// One line of the branch selection menu, numbered from 1.
pub fn format_branch_choice(index: usize, choice: &BranchChoice) -> String {
    match &choice.last_tag {
        Some(tag) => format!(
            "{}: {} (Last tag: {})",
            index + 1,
            choice.branch,
            style(tag).green()
        ),
        None => format!(
            "{}: {} (No existing tags, format: {})",
            index + 1,
            choice.branch,
            choice.format
        ),
    }
}

/// Display the last tag and the suggested next tag.
///
/// With no previous tag, announces that the first tag is being created.
pub fn display_suggestion(last_tag: Option<&str>, next_tag: &str) {
    match last_tag {
        Some(last) => println!(
            "Last tag: {}, suggested next tag: {}",
            last,
            style(next_tag).green()
        ),
        None => println!("{}", style("Creating first tag for this branch...").cyan()),
    }
}

/// Display configured branches and their tag formats.
pub fn display_available_branches(branch_tags: &[BranchTagConfig]) {
    println!("{}", style("Configured branches:").bold());
    for bt in branch_tags {
        println!("  - {} (format: {})", bt.branch, bt.tag);
    }
}

/// Display manual push instruction for a tag.
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} To push this tag later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} {}", remote, tag)).cyan()
    );
}

/// Describe what a dry run would have done.
pub fn format_dry_run(tag: &str, branch: &str, push_remote: Option<&str>) -> Vec<String> {
    let mut steps = vec![format!("Would create tag {} on branch {}", tag, branch)];
    match push_remote {
        Some(remote) => steps.push(format!("Would push {} to {}", tag, remote)),
        None => steps.push("Would keep the tag local".to_string()),
    }
    steps
}
