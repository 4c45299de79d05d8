//! # ship - local-first project tracker
//!
//! Track projects from idea to launch with tasks, milestones, notes, links,
//! secrets and members, all stored in one JSON file under `~/.ship/`.
//!
//! ## Shorthand
//!
//! Tasks and milestones are entered as a single line of text with inline tags:
//!
//! ```bash
//! # Task: title, #type, !priority and in:<duration>
//! ship task add Rocket "Fix login bug #bug !high in:2d"
//!
//! # Milestone: title plus by:YYYY-MM-DD or a relative in:<duration>
//! ship milestone add Rocket "Public beta by:2024-06-01"
//! ship milestone add Rocket "Pricing page live in:2w"
//! ```
//!
//! Durations are stored normalized (`"2 days"`, `"1 week"`) and feed the
//! progress rollups shown by `ship stats` and the dashboard.
//!
//! ## Quick Start
//!
//! ```bash
//! ship config set-user --name "Ada" --email ada@example.com
//! ship project new Rocket --template pre-launch --launch-date "in 8w"
//! ship task list Rocket
//! ship stats Rocket
//! ship ui
//! ```
//!
//! ## Key Commands
//!
//! - `ship project new|list|show|launch|star|archive|delete` - project lifecycle
//! - `ship task add|edit|toggle|list` - tasks via shorthand
//! - `ship milestone add|edit|toggle|list` - milestones via shorthand
//! - `ship parse task|milestone <text>` - preview what shorthand parses to
//! - `ship ui [project]` - terminal dashboard
//!
//! Set `SHIP_HOME` (or pass `--home`) to keep data somewhere other than `~/.ship`.
//! `RUST_LOG` and `--verbose` control diagnostic output on stderr.

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod cmd;
pub mod config;
pub mod db;
pub mod duration;
pub mod error;
pub mod fields;
pub mod project;
pub mod shorthand;
pub mod stats;
pub mod task;
pub mod template;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::{Commands, Context};
use config::{resolve_db_path, resolve_home, Config};
use error::Result;

fn main() {
    let cli = Cli::parse();

    // --verbose wins over RUST_LOG; without either only warnings are shown.
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.as_str())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::WARN.as_str()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Completions need neither a data directory nor a database.
    if let Commands::Completions { shell } = cli.command {
        cmd::cmd_completions(shell);
        return Ok(());
    }

    let home = resolve_home(cli.home)?;
    let db_path = resolve_db_path(&home, cli.db);
    let config = Config::load(&home)?;
    tracing::debug!(home = %home.display(), db = %db_path.display(), "resolved paths");

    let mut ctx = Context { home, db_path, config };
    cmd::run(&mut ctx, cli.command)
}
