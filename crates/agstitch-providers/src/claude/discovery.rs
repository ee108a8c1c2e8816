use crate::Result;
use crate::summary::FragmentSummary;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::io::summarize_fragment;

/// True for top-level session logs: non-empty `.jsonl` files whose stem is
/// not an `agent-*` sub-thread log.
pub fn is_fragment_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }

    if path.extension().is_none_or(|e| e != "jsonl") {
        return false;
    }

    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    if stem.is_empty() || stem.starts_with("agent-") {
        return false;
    }

    if let Ok(metadata) = std::fs::metadata(path)
        && metadata.len() == 0
    {
        return false;
    }

    true
}

/// Log directory Claude uses for a workspace path
pub fn project_log_dir(corpus_root: &Path, project_root: &Path) -> PathBuf {
    corpus_root.join(agstitch_core::encode_project_dir(project_root))
}

/// Summarize every session log in the corpus.
///
/// Only `<root>/<workspace>/<id>.jsonl` is considered; side directories sit
/// one level deeper and are reached through each summary instead. Files that
/// cannot be read are logged and skipped. A missing root yields an empty list.
pub fn scan_corpus(root: &Path) -> Result<Vec<FragmentSummary>> {
    scan_depth(root, 2)
}

/// Summarize the session logs of a single workspace directory
pub fn scan_project_dir(dir: &Path) -> Result<Vec<FragmentSummary>> {
    scan_depth(dir, 1)
}

fn scan_depth(root: &Path, depth: usize) -> Result<Vec<FragmentSummary>> {
    if !root.is_dir() {
        tracing::debug!(root = %root.display(), "log directory does not exist");
        return Ok(Vec::new());
    }

    let mut summaries = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(depth)
        .max_depth(depth)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("skipping unreadable entry: {}", err);
                continue;
            }
        };
        let path = entry.path();
        if !is_fragment_file(path) {
            continue;
        }

        match summarize_fragment(path) {
            Ok(summary) => summaries.push(summary),
            Err(err) => tracing::warn!(path = %path.display(), "skipping session log: {}", err),
        }
    }

    tracing::debug!(root = %root.display(), count = summaries.len(), "scanned session logs");
    Ok(summaries)
}
