use serde::Serialize;

use super::merge::MergeResultViewModel;
use super::session::SessionListEntry;

#[derive(Debug, Serialize)]
pub struct SplitListViewModel {
    pub groups: Vec<SplitGroupViewModel>,
    #[serde(skip)]
    pub preview_chars: usize,
}

#[derive(Debug, Serialize)]
pub struct SplitGroupViewModel {
    pub tag: String,
    /// Members in merge order
    pub members: Vec<SessionListEntry>,
    pub total_bytes: u64,
    pub first_timestamp: Option<String>,
    pub last_timestamp: Option<String>,
    pub suggested_command: String,
}

#[derive(Debug, Serialize)]
pub struct SplitMergeViewModel {
    pub dry_run: bool,
    pub target_dir: String,
    pub groups: Vec<GroupResultViewModel>,
    pub merged: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
pub struct GroupResultViewModel {
    pub tag: String,
    pub members: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge: Option<MergeResultViewModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
