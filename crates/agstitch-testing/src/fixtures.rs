//! Session log fixtures.
//!
//! `SessionBuilder` produces JSONL in the shape Claude Code writes: chained
//! `user`/`assistant` records with `uuid`/`parentUuid`, one-minute spacing,
//! plus optional `custom-title` lines, malformed lines and side files.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CWD: &str = "/Users/test_user/agent-sample";
const DEFAULT_START: &str = "2025-01-01T10:00:00Z";

/// Fluent builder for one session file.
///
/// # Example
/// ```no_run
/// use agstitch_testing::SessionBuilder;
///
/// let lines = SessionBuilder::new("s1")
///     .user("fix the login bug")
///     .assistant("looking")
///     .title("login")
///     .to_jsonl();
/// ```
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    session_id: String,
    cwd: String,
    start: DateTime<Utc>,
    lines: Vec<String>,
    uuids: Vec<String>,
    last_uuid: Option<String>,
    step: i64,
    side_files: Vec<(String, String)>,
}

impl SessionBuilder {
    pub fn new(session_id: impl Into<String>) -> Self {
        let start = DateTime::parse_from_rfc3339(DEFAULT_START)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());
        Self {
            session_id: session_id.into(),
            cwd: DEFAULT_CWD.to_string(),
            start,
            lines: Vec::new(),
            uuids: Vec::new(),
            last_uuid: None,
            step: 0,
            side_files: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn cwd(mut self, cwd: impl Into<String>) -> Self {
        self.cwd = cwd.into();
        self
    }

    /// Time of the first record (RFC 3339); later records follow a minute apart
    pub fn starting_at(mut self, rfc3339: &str) -> Self {
        if let Ok(dt) = DateTime::parse_from_rfc3339(rfc3339) {
            self.start = dt.with_timezone(&Utc);
        }
        self
    }

    pub fn user(self, text: &str) -> Self {
        self.message("user", json!(text))
    }

    pub fn assistant(self, text: &str) -> Self {
        self.message("assistant", json!([{ "type": "text", "text": text }]))
    }

    /// Assistant reply that branches off the record before the last one,
    /// the way an interrupted-and-retried step looks on disk
    pub fn retry(mut self, text: &str) -> Self {
        let parent = match self.uuids.len() {
            0 | 1 => None,
            n => Some(self.uuids[n - 2].clone()),
        };
        let uuid = self.next_uuid();
        let line = json!({
            "parentUuid": parent,
            "isSidechain": false,
            "cwd": self.cwd,
            "sessionId": self.session_id,
            "type": "assistant",
            "message": { "role": "assistant", "content": [{ "type": "text", "text": text }] },
            "uuid": uuid,
            "timestamp": self.next_timestamp(),
        });
        self.lines.push(line.to_string());
        self
    }

    /// `/rename` marker carrying the group tag
    pub fn title(mut self, title: &str) -> Self {
        let line = json!({
            "type": "custom-title",
            "customTitle": title,
            "sessionId": self.session_id,
        });
        self.lines.push(line.to_string());
        self
    }

    /// Unparsable line
    pub fn malformed(mut self) -> Self {
        self.lines.push("{\"type\":\"user\",\"uuid\":".to_string());
        self
    }

    /// Arbitrary JSON line, written as given
    pub fn raw(mut self, value: Value) -> Self {
        self.lines.push(value.to_string());
        self
    }

    /// File under `<id>/subagents/`
    pub fn side_file(mut self, name: &str, content: &str) -> Self {
        self.side_files.push((name.to_string(), content.to_string()));
        self
    }

    /// Ids of every record written with a `uuid`, in order
    pub fn uuids(&self) -> &[String] {
        &self.uuids
    }

    pub fn to_jsonl(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// Write `<dir>/<session_id>.jsonl` and any side files
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.jsonl", self.session_id));
        fs::write(&path, self.to_jsonl())?;

        if !self.side_files.is_empty() {
            let side = dir.join(&self.session_id).join("subagents");
            fs::create_dir_all(&side)?;
            for (name, content) in &self.side_files {
                fs::write(side.join(name), content)?;
            }
        }
        Ok(path)
    }

    fn message(mut self, role: &str, content: Value) -> Self {
        let uuid = self.next_uuid();
        let line = json!({
            "parentUuid": self.last_uuid,
            "isSidechain": false,
            "userType": "external",
            "cwd": self.cwd,
            "sessionId": self.session_id,
            "version": "2.0.0",
            "type": role,
            "message": { "role": role, "content": content },
            "uuid": uuid,
            "timestamp": self.next_timestamp(),
        });
        self.lines.push(line.to_string());
        self.last_uuid = Some(uuid);
        self
    }

    fn next_uuid(&mut self) -> String {
        let uuid = record_uuid(&self.session_id, self.uuids.len());
        self.uuids.push(uuid.clone());
        uuid
    }

    fn next_timestamp(&mut self) -> String {
        let at = self.start + Duration::minutes(self.step);
        self.step += 1;
        at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }
}

/// Deterministic UUID-shaped id for the n-th record of a session
pub fn record_uuid(session_id: &str, index: usize) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(session_id.as_bytes());
    hasher.update(index.to_le_bytes());
    let hash = hasher.finalize();
    let hex: String = hash.iter().take(16).map(|b| format!("{:02x}", b)).collect();

    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
