use crate::{FragmentId, Record, Timestamp};
use std::fmt;

/// A line that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// Where the line came from (usually a file path)
    pub source: String,
    /// 1-based line number
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: skipped malformed record: {}",
            self.source, self.line, self.message
        )
    }
}

/// Result of parsing a whole fragment: the usable records plus one warning
/// per skipped line
#[derive(Debug, Clone)]
pub struct FragmentLoad {
    pub fragment: Fragment,
    pub warnings: Vec<ParseWarning>,
}

/// The ordered records of one source log
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    id: FragmentId,
    records: Vec<Record>,
}

impl Fragment {
    pub fn new(id: FragmentId, records: Vec<Record>) -> Self {
        Self { id, records }
    }

    /// Parse JSONL text. Blank lines are ignored, malformed lines skipped.
    pub fn parse(id: FragmentId, source: &str, text: &str) -> FragmentLoad {
        Self::parse_bytes(id, source, text.as_bytes())
    }

    /// Parse raw file contents line by line.
    ///
    /// A line that is not valid UTF-8 is malformed like any other unparsable
    /// line; it is never lossily repaired.
    pub fn parse_bytes(id: FragmentId, source: &str, bytes: &[u8]) -> FragmentLoad {
        let mut records = Vec::new();
        let mut warnings = Vec::new();

        for (idx, raw) in bytes.split(|b| *b == b'\n').enumerate() {
            let parsed = match std::str::from_utf8(raw) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => Record::from_line(line.trim()).map_err(|err| err.to_string()),
                Err(err) => Err(format!("invalid UTF-8: {}", err)),
            };

            match parsed {
                Ok(record) => records.push(record),
                Err(message) => warnings.push(ParseWarning {
                    source: source.to_string(),
                    line: idx + 1,
                    message,
                }),
            }
        }

        FragmentLoad {
            fragment: Self::new(id, records),
            warnings,
        }
    }

    pub fn id(&self) -> &FragmentId {
        &self.id
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn message_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_message()).count()
    }

    pub fn earliest_timestamp(&self) -> Option<Timestamp> {
        self.records.iter().filter_map(Record::timestamp).min()
    }

    pub fn latest_timestamp(&self) -> Option<Timestamp> {
        self.records.iter().filter_map(Record::timestamp).max()
    }

    /// Tag carried by the last record that has one, so a conversation renamed
    /// partway through groups under its latest name
    pub fn effective_group_tag(&self) -> Option<&str> {
        self.records.iter().rev().find_map(Record::group_tag)
    }

    pub fn first_user_text(&self) -> Option<&str> {
        self.records.iter().find_map(Record::user_text)
    }

    pub fn cwd(&self) -> Option<&str> {
        self.records.iter().find_map(Record::cwd)
    }
}
