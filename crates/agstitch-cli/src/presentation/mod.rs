//! # Presentation Layer
//!
//! ```text
//! [ Handler ] --> [ Presenter ] --> [ ViewModel ] --> [ Renderer ] ==(JSON)==> serde_json --> stdout
//!                                                                  ==(Text)==> [ View ] --> stdout
//! ```
//!
//! * `view_models/` hold raw data (counts, bytes, RFC 3339 strings) and are
//!   the JSON contract.
//! * `presenters/` turn runtime results into view models.
//! * `views/` implement `fmt::Display` for view models: layout, colors and
//!   formatting via `formatters/`.
//! * `renderers/` pick JSON or text.
//!
//! Warnings never go through here; handlers write them to stderr.

pub mod formatters;
pub mod presenters;
pub mod renderers;
pub mod view_models;
pub mod views;

pub use renderers::{ConsoleRenderer, Renderer};
pub use view_models::{CommandResultViewModel, Guidance, StatusBadge, StatusLevel};
