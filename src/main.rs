use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tag_publish::cli::{run_publish_workflow, PublishWorkflowArgs};
use tag_publish::config::{self, CONFIG_FILE_NAME};
use tag_publish::git::Git2Repository;
use tag_publish::ui::{self, TerminalPrompter};

#[derive(clap::Parser)]
#[command(
    name = "tag-publish",
    version,
    about = "Create and push version tags on branches without switching the working branch"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Explicitly specify branch to tag")]
    branch: Option<String>,

    #[arg(short, long, help = "Explicitly specify the tag to create")]
    tag: Option<String>,

    #[arg(short, long, help = "Skip prompts: use the suggested tag and push")]
    force: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Create the tag locally without pushing")]
    no_push: bool,

    #[arg(long, help = "Do not fetch from the remote before resolving tags")]
    no_fetch: bool,

    #[arg(long, help = "Show configured branches and their tag formats, then exit")]
    list: bool,

    #[arg(long, help = "Write a default tagpublish.toml to the current directory")]
    init: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v debug, -vv trace)")]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    // RUST_LOG wins over -v; logs go to stderr so they don't mix with prompts
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&e.to_string());
        for cause in e.chain().skip(1) {
            eprintln!("  Caused by: {}", cause);
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if args.init {
        config::write_default_config(Path::new(CONFIG_FILE_NAME))?;
        ui::display_success(&format!("Wrote default configuration to {}", CONFIG_FILE_NAME));
        return Ok(());
    }

    let config = config::load_config(args.config.as_deref())?;

    if args.list {
        ui::display_available_branches(&config.branch_tags);
        return Ok(());
    }

    let repo = Git2Repository::open(".")
        .map_err(|e| anyhow::anyhow!("Not in a git repository: {}", e))?;

    ui::display_status("Initializing tag-publish...");
    let workflow_args = PublishWorkflowArgs {
        branch: args.branch,
        tag: args.tag,
        force: args.force,
        dry_run: args.dry_run,
        no_push: args.no_push,
        no_fetch: args.no_fetch,
    };

    let mut prompter = TerminalPrompter::new();
    run_publish_workflow(&repo, &mut prompter, &config, &workflow_args)?;
    Ok(())
}
