//! `fmt::Display` for view models (text output)

mod merge;
mod session;
mod split;
