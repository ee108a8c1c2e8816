//! Testing infrastructure for agstitch integration tests.
//!
//! - `TestWorld`: isolated corpus + data directory and a CLI runner
//! - `fixtures`: `SessionBuilder` for writing Claude-style session logs
//! - `assertions`: checks over merged JSONL output

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use fixtures::SessionBuilder;
pub use world::{CliResult, TestWorld};
