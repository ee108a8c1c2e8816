use agstitch_types::{FragmentId, Timestamp};
use serde::Serialize;
use std::path::PathBuf;

/// Metadata about one fragment file, gathered without keeping its records.
///
/// This is what listings, split detection and dry-run plans work from.
#[derive(Debug, Clone, Serialize)]
pub struct FragmentSummary {
    /// Session UUID (the file stem).
    pub id: FragmentId,
    /// Absolute path to the `.jsonl` file.
    pub path: PathBuf,
    /// Per-project log directory containing the file.
    pub project_dir: PathBuf,
    /// Working directory recorded in the transcript, if any.
    pub project_root: Option<String>,
    /// File size in bytes.
    pub size_bytes: u64,
    /// File modification time (RFC 3339).
    pub modified: Option<String>,
    /// Parsed records.
    pub record_count: usize,
    /// `user` and `assistant` records.
    pub message_count: usize,
    /// Lines that failed to parse.
    pub malformed_lines: usize,
    pub first_timestamp: Option<Timestamp>,
    pub last_timestamp: Option<Timestamp>,
    /// Effective group tag (the last `customTitle` in the file).
    pub group_tag: Option<String>,
    /// First human-typed text, untruncated.
    pub preview: Option<String>,
    /// Files in the side directory (`<id>/subagents/`).
    pub sidechain_files: Vec<PathBuf>,
}

impl FragmentSummary {
    /// Sort key for chronological ordering; fragments without timestamps last
    pub fn sort_key(&self) -> Timestamp {
        self.first_timestamp.unwrap_or(Timestamp::MAX)
    }
}
