//! Custom assertions for merged session files.
//!
//! Provides high-level checks that keep tests readable:
//! - JSON envelope counts
//! - Parent-chain connectivity
//! - Timestamp ordering and session labels

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Parse every line of a JSONL file.
pub fn read_jsonl(path: &Path) -> Result<Vec<Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("{}:{}: invalid JSON", path.display(), i + 1))
        })
        .collect()
}

/// Assert that JSON output contains expected number of sessions.
pub fn assert_session_count(json: &Value, expected: usize) -> Result<()> {
    let sessions = json["content"]["sessions"]
        .as_array()
        .context("Expected 'content.sessions' array in JSON")?;

    if sessions.len() != expected {
        anyhow::bail!("Expected {} sessions, got {}", expected, sessions.len());
    }

    Ok(())
}

/// Assert that walking `parentUuid` from `leaf` reaches a root after
/// exactly `hops` links.
pub fn assert_chain_connected(records: &[Value], leaf: &str, hops: usize) -> Result<()> {
    let mut by_id: HashMap<&str, &Value> = HashMap::new();
    for record in records {
        if let Some(id) = record["uuid"].as_str() {
            by_id.entry(id).or_insert(record);
        }
    }

    let mut current = *by_id
        .get(leaf)
        .with_context(|| format!("Leaf {} not found", leaf))?;
    let mut walked = 0;
    while let Some(parent) = current["parentUuid"].as_str().filter(|p| !p.is_empty()) {
        current = *by_id
            .get(parent)
            .with_context(|| format!("Chain broken at {} (after {} hops)", parent, walked))?;
        walked += 1;
        if walked > records.len() {
            anyhow::bail!("Cycle detected while walking from {}", leaf);
        }
    }

    if walked != hops {
        anyhow::bail!("Expected {} hops from {}, walked {}", hops, leaf, walked);
    }
    Ok(())
}

/// Assert that timestamped records appear in non-decreasing order.
pub fn assert_sorted_by_timestamp(records: &[Value]) -> Result<()> {
    let mut previous: Option<chrono::DateTime<chrono::FixedOffset>> = None;
    for (i, record) in records.iter().enumerate() {
        let Some(raw) = record["timestamp"].as_str() else {
            continue;
        };
        let at = chrono::DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("Record {} has invalid timestamp {}", i, raw))?;
        if let Some(prev) = previous
            && at < prev
        {
            anyhow::bail!("Record {} at {} precedes {}", i, raw, prev.to_rfc3339());
        }
        previous = Some(at);
    }
    Ok(())
}

/// Assert that every record carries the given `sessionId`.
pub fn assert_all_session_ids(records: &[Value], expected: &str) -> Result<()> {
    for (i, record) in records.iter().enumerate() {
        let actual = record["sessionId"].as_str();
        if actual != Some(expected) {
            anyhow::bail!("Record {} has sessionId {:?}, expected {}", i, actual, expected);
        }
    }
    Ok(())
}
