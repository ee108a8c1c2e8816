use agstitch_types::FragmentId;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MergeResultViewModel {
    /// "planned" for a dry run, otherwise "merged"
    pub status: &'static str,
    pub target_id: String,
    pub target_path: String,
    pub title: Option<String>,
    pub delete_sources: bool,
    pub sources: Vec<PlannedSourceViewModel>,
    pub records_written: Option<usize>,
    pub message_count: Option<usize>,
    pub splices: Vec<SpliceViewModel>,
    pub unlinked: Vec<String>,
    pub sidechains: Vec<SidechainViewModel>,
    pub catalog: Option<String>,
    pub deleted: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PlannedSourceViewModel {
    pub id: FragmentId,
    pub path: String,
    pub size_bytes: u64,
    pub first_timestamp: Option<String>,
    pub record_count: usize,
    pub sidechain_files: usize,
}

#[derive(Debug, Serialize)]
pub struct SpliceViewModel {
    pub fragment: String,
    pub record: String,
    pub new_parent: String,
}

#[derive(Debug, Serialize)]
pub struct SidechainViewModel {
    pub from: String,
    pub to: String,
    pub renamed: bool,
}
