use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Local-first project tracker for indie makers.
/// Data lives in ~/.ship (or --home / SHIP_HOME); the document file can be overridden with --db.
#[derive(Parser)]
#[command(name = "ship", version, about = "Track projects, tasks and milestones from the terminal")]
pub struct Cli {
    /// Data directory holding config.json and the default database.
    #[arg(long, global = true, env = "SHIP_HOME")]
    pub home: Option<PathBuf>,

    /// Path to the JSON database file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log parsing and storage decisions to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
