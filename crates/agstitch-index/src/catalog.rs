use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const CATALOG_FILE: &str = "sessions-index.json";

const CATALOG_VERSION: u64 = 1;

fn default_version() -> u64 {
    CATALOG_VERSION
}

/// The entry written for a merged session.
///
/// Only new entries are built from this type. Entries already in the file
/// stay raw JSON objects and are written back exactly as they were read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub session_id: String,
    pub full_path: String,
    /// Milliseconds since the Unix epoch
    pub file_mtime: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_prompt: Option<String>,
    pub message_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,
    pub is_sidechain: bool,
    /// Set on sessions produced by a merge
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_merged: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default = "default_version")]
    version: u64,
    #[serde(default)]
    entries: Vec<Map<String, Value>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Default for CatalogFile {
    fn default() -> Self {
        Self {
            version: CATALOG_VERSION,
            entries: Vec::new(),
            extra: Map::new(),
        }
    }
}

fn entry_id(entry: &Map<String, Value>) -> Option<&str> {
    entry.get("sessionId").and_then(Value::as_str)
}

/// The catalog of one workspace log directory
#[derive(Debug, Clone)]
pub struct SessionCatalog {
    path: PathBuf,
    file: CatalogFile,
}

impl SessionCatalog {
    /// Load `<dir>/sessions-index.json`. A missing file is an empty catalog;
    /// a file that exists but does not parse is `Error::Malformed`.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CATALOG_FILE);
        let file = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|source| Error::Malformed {
                    path: path.clone(),
                    source,
                })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => CatalogFile::default(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[Map<String, Value>] {
        &self.file.entries
    }

    pub fn get(&self, session_id: &str) -> Option<&Map<String, Value>> {
        self.file
            .entries
            .iter()
            .find(|entry| entry_id(entry) == Some(session_id))
    }

    /// Whether the entry for `session_id` carries `isMerged: true`
    pub fn is_merged(&self, session_id: &str) -> bool {
        self.get(session_id)
            .and_then(|entry| entry.get("isMerged"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Insert the entry, or overwrite the fields of the one with the same
    /// `sessionId`. Keys of an existing entry that `entry` does not set are kept.
    pub fn upsert(&mut self, entry: CatalogEntry) -> Result<()> {
        let fields = match serde_json::to_value(&entry)? {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        match self
            .file
            .entries
            .iter_mut()
            .find(|existing| entry_id(existing) == Some(entry.session_id.as_str()))
        {
            Some(existing) => existing.extend(fields),
            None => self.file.entries.push(fields),
        }
        Ok(())
    }

    /// Drop an entry; returns whether one was present
    pub fn remove(&mut self, session_id: &str) -> bool {
        let before = self.file.entries.len();
        self.file
            .entries
            .retain(|entry| entry_id(entry) != Some(session_id));
        self.file.entries.len() != before
    }

    /// Write the catalog through a temporary sibling and rename it into place
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.file)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self
            .path
            .with_file_name(format!(".{}.tmp-{}", CATALOG_FILE, std::process::id()));
        let written = fs::File::create(&tmp_path).and_then(|mut file| {
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()
        });
        if let Err(err) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }

        fs::rename(&tmp_path, &self.path)?;
        tracing::debug!(path = %self.path.display(), entries = self.file.entries.len(), "saved session catalog");
        Ok(())
    }
}
