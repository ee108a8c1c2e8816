use super::args::{Cli, Commands, SessionCommand, SplitCommand};
use super::context::ExecutionContext;
use super::handlers;
use super::logging;
use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);
    let ctx = ExecutionContext::from_cli(&cli)?;

    match cli.command {
        Commands::Session { command } => match command {
            SessionCommand::List { limit } => handlers::session_list::handle(&ctx, limit),
            SessionCommand::Show { session_id } => handlers::session_show::handle(&ctx, &session_id),
        },

        Commands::Split { command } => match command {
            SplitCommand::List => handlers::split_list::handle(&ctx),
            SplitCommand::Merge {
                yes,
                delete,
                dry_run,
            } => handlers::split_merge::handle(&ctx, yes, delete, dry_run),
        },

        Commands::Merge {
            sessions,
            name,
            id,
            delete,
            dry_run,
            target_dir,
        } => handlers::merge::handle(
            &ctx,
            handlers::merge::MergeArgs {
                sessions,
                name,
                id,
                delete,
                dry_run,
                target_dir,
            },
        ),
    }
}
