// NOTE: Command Organization Rationale
//
// Namespaces group related operations: `session` reads, `split` finds and
// merges groups across the corpus, `merge` stitches sessions named by id.

mod commands;
mod enums;

pub use commands::*;
pub use enums::*;

use clap::Parser;

#[derive(Parser)]
#[command(name = "agstitch")]
#[command(
    about = "Reassemble Claude Code sessions that were split across several log files",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Data directory (config.toml); defaults to AGSTITCH_PATH or the platform data dir
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Session log root; defaults to the config value or ~/.claude/projects
    #[arg(long, global = true)]
    pub corpus_root: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[arg(long, global = true)]
    pub project_root: Option<String>,

    #[arg(long, global = true)]
    pub all_projects: bool,

    #[command(subcommand)]
    pub command: Commands,
}
