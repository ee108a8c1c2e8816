use agstitch_types::FragmentId;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SessionListViewModel {
    pub sessions: Vec<SessionListEntry>,
    pub total_count: usize,
    /// Project the listing was limited to; `None` for the whole corpus
    pub project_filter: Option<String>,
    pub limit: usize,
    #[serde(skip)]
    pub preview_chars: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionListEntry {
    pub id: FragmentId,
    pub path: String,
    pub project_root: Option<String>,
    pub first_timestamp: Option<String>,
    pub last_timestamp: Option<String>,
    pub message_count: usize,
    pub size_bytes: u64,
    pub group_tag: Option<String>,
    pub preview: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionDetailViewModel {
    pub id: String,
    pub path: String,
    pub project_dir: String,
    pub project_root: Option<String>,
    pub size_bytes: u64,
    pub modified: Option<String>,
    pub record_count: usize,
    pub message_count: usize,
    pub malformed_lines: usize,
    pub first_timestamp: Option<String>,
    pub last_timestamp: Option<String>,
    pub group_tag: Option<String>,
    pub preview: Option<String>,
    pub sidechain_files: Vec<String>,
    pub trunk: Option<TrunkViewModel>,
    pub identified_records: usize,
    pub roots: usize,
    pub leaves: usize,
    /// Leaves beyond the first: retried or abandoned branches
    pub branches: usize,
    pub dangling_parents: usize,
    pub cycle_detected: bool,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TrunkViewModel {
    pub root: String,
    pub leaf: String,
    pub length: usize,
}
