use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect individual sessions
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Find and merge sessions that share a title
    Split {
        #[command(subcommand)]
        command: SplitCommand,
    },

    /// Merge the given sessions into one new session
    Merge {
        /// Session ids, unique id prefixes, or paths to .jsonl files
        #[arg(required = true)]
        sessions: Vec<String>,

        /// Title (customTitle) for the merged session
        #[arg(long)]
        name: Option<String>,

        /// Session id for the merged file instead of a new UUID
        #[arg(long)]
        id: Option<String>,

        /// Delete the sources once the merged session is written
        #[arg(long)]
        delete: bool,

        /// Show the plan without reading, writing or deleting anything
        #[arg(long)]
        dry_run: bool,

        /// Directory for the merged file (default: the first source's)
        #[arg(long)]
        target_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Sessions of the current project (or all with --all-projects), newest first
    List {
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Metadata and trunk diagnostics for one session
    Show { session_id: String },
}

#[derive(Subcommand)]
pub enum SplitCommand {
    /// Groups of sessions sharing a title
    List,

    /// Merge every group into the bulk-merge directory
    Merge {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,

        /// Delete the sources of each group once its merge is written
        #[arg(long)]
        delete: bool,

        #[arg(long)]
        dry_run: bool,
    },
}
