use crate::{Error, RecordId, Result, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON keys the stitcher interprets. Everything else is opaque payload.
pub mod keys {
    pub const TYPE: &str = "type";
    pub const UUID: &str = "uuid";
    pub const PARENT_UUID: &str = "parentUuid";
    pub const TIMESTAMP: &str = "timestamp";
    pub const SESSION_ID: &str = "sessionId";
    pub const CUSTOM_TITLE: &str = "customTitle";
    pub const CWD: &str = "cwd";
    pub const MESSAGE: &str = "message";
    pub const IS_META: &str = "isMeta";
    pub const IS_SIDECHAIN: &str = "isSidechain";

    pub const TYPE_CUSTOM_TITLE: &str = "custom-title";
    pub const TYPE_USER: &str = "user";
    pub const TYPE_ASSISTANT: &str = "assistant";
}

/// One transcript line.
///
/// The record keeps the full JSON object in its original key order so that
/// unknown fields round-trip untouched. Interpreted fields are read through
/// accessors and rewritten in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Parse a single JSONL line
    pub fn from_line(line: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(line)? {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(Error::NotAnObject("null")),
            Value::Bool(_) => Err(Error::NotAnObject("a boolean")),
            Value::Number(_) => Err(Error::NotAnObject("a number")),
            Value::String(_) => Err(Error::NotAnObject("a string")),
            Value::Array(_) => Err(Error::NotAnObject("an array")),
        }
    }

    /// Serialize back to a single JSONL line (no trailing newline)
    pub fn to_line(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Synthetic title marker appended after a merge
    pub fn title_marker(title: &str, session_id: &str, at: Timestamp) -> Self {
        let mut map = Map::new();
        map.insert(keys::TYPE.into(), Value::from(keys::TYPE_CUSTOM_TITLE));
        map.insert(keys::CUSTOM_TITLE.into(), Value::from(title));
        map.insert(keys::SESSION_ID.into(), Value::from(session_id));
        map.insert(keys::TIMESTAMP.into(), Value::from(at.to_rfc3339()));
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn record_type(&self) -> Option<&str> {
        self.str_field(keys::TYPE)
    }

    pub fn id(&self) -> Option<&str> {
        self.str_field(keys::UUID)
    }

    /// Parent reference; `null`, missing and `""` all mean "root"
    pub fn parent_id(&self) -> Option<&str> {
        self.str_field(keys::PARENT_UUID)
    }

    /// Parsed timestamp, `None` when absent or unparsable
    pub fn timestamp(&self) -> Option<Timestamp> {
        self.str_field(keys::TIMESTAMP).and_then(Timestamp::parse)
    }

    pub fn session_label(&self) -> Option<&str> {
        self.str_field(keys::SESSION_ID)
    }

    pub fn group_tag(&self) -> Option<&str> {
        self.str_field(keys::CUSTOM_TITLE)
    }

    pub fn cwd(&self) -> Option<&str> {
        self.str_field(keys::CWD)
    }

    pub fn is_message(&self) -> bool {
        matches!(
            self.record_type(),
            Some(keys::TYPE_USER) | Some(keys::TYPE_ASSISTANT)
        )
    }

    pub fn is_meta(&self) -> bool {
        self.bool_field(keys::IS_META)
    }

    pub fn is_sidechain(&self) -> bool {
        self.bool_field(keys::IS_SIDECHAIN)
    }

    /// Text a human typed, for previews.
    ///
    /// Only non-meta `user` lines count. `message.content` may be a plain
    /// string or an array of blocks; the first `text` block wins.
    pub fn user_text(&self) -> Option<&str> {
        if self.record_type() != Some(keys::TYPE_USER) || self.is_meta() {
            return None;
        }

        let text = match self.0.get(keys::MESSAGE)?.get("content")? {
            Value::String(text) => Some(text.as_str()),
            Value::Array(blocks) => blocks.iter().find_map(|block| {
                if block.get("type").and_then(Value::as_str) == Some("text") {
                    block.get("text").and_then(Value::as_str)
                } else {
                    None
                }
            }),
            _ => None,
        };
        text.filter(|text| !text.trim().is_empty())
    }

    pub fn set_parent_id(&mut self, parent: &RecordId) {
        self.0
            .insert(keys::PARENT_UUID.into(), Value::from(parent.as_str()));
    }

    pub fn set_session_label(&mut self, session_id: &str) {
        self.0.insert(keys::SESSION_ID.into(), Value::from(session_id));
    }

    pub fn set_group_tag(&mut self, tag: &str) {
        self.0.insert(keys::CUSTOM_TITLE.into(), Value::from(tag));
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    fn bool_field(&self, key: &str) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(false)
    }
}
