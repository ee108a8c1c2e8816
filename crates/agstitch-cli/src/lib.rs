// NOTE: agstitch ground rules
//
// Sources are never edited in place:
// - The merged session is written to a new file and renamed into place first
// - Only then may `--delete` touch the sources
//
// Split groups come from `customTitle` only:
// - Untitled splits are merged by id with `agstitch merge`

mod args;
mod commands;
mod context;
mod handlers;
mod logging;
pub mod presentation;

pub use args::{Cli, Commands, LogLevel, OutputFormat, SessionCommand, SplitCommand};
pub use commands::run;
