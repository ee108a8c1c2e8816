use crate::ops::corpus::CorpusService;
use crate::ops::merge::{MergeOutcome, MergePipeline, MergeProgress, MergeRequest};
use crate::Result;
use agstitch_engine::{SplitGroup, find_split_groups};
use agstitch_index::SessionCatalog;
use agstitch_providers::FragmentSummary;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum SplitProgress {
    GroupStarted { tag: String, members: usize },
    Merge { tag: String, event: MergeProgress },
    GroupFailed { tag: String, reason: String },
    GroupFinished { tag: String },
}

/// Result of merging one group; failures stay inside their group
#[derive(Debug)]
pub struct GroupOutcome {
    pub tag: String,
    pub members: Vec<FragmentSummary>,
    pub result: Result<MergeOutcome>,
}

/// Finds sessions that share a title and merges each such group into the
/// fixed bulk-merge directory.
pub struct SplitService<'a> {
    corpus: &'a CorpusService,
    merged_dir: PathBuf,
}

impl<'a> SplitService<'a> {
    pub fn new(corpus: &'a CorpusService, merged_dir: PathBuf) -> Self {
        Self { corpus, merged_dir }
    }

    /// Split groups from a fresh scan, members in chronological order.
    ///
    /// Sessions already recorded as merge outputs in their directory catalog
    /// are left out so that a merged session is not merged again with its
    /// own sources.
    pub fn detect(&self) -> Result<Vec<SplitGroup<FragmentSummary>>> {
        let mut sessions = self.corpus.scan()?;
        let merged = merged_outputs(&sessions);
        sessions.retain(|s| !merged.contains(s.id.as_str()));
        sessions.sort_by_key(FragmentSummary::sort_key);

        Ok(find_split_groups(sessions, |s| s.group_tag.as_deref()))
    }

    /// Detect and merge every group
    pub fn merge_all<F>(&self, delete_sources: bool, dry_run: bool, on_progress: F) -> Result<Vec<GroupOutcome>>
    where
        F: FnMut(SplitProgress),
    {
        let groups = self.detect()?;
        Ok(self.merge_groups(groups, delete_sources, dry_run, on_progress))
    }

    /// Merge each group independently; one failing group never stops the rest
    pub fn merge_groups<F>(
        &self,
        groups: Vec<SplitGroup<FragmentSummary>>,
        delete_sources: bool,
        dry_run: bool,
        mut on_progress: F,
    ) -> Vec<GroupOutcome>
    where
        F: FnMut(SplitProgress),
    {
        let pipeline = MergePipeline::new(self.corpus);
        let mut outcomes = Vec::with_capacity(groups.len());

        for group in groups {
            let tag = group.tag;
            on_progress(SplitProgress::GroupStarted {
                tag: tag.clone(),
                members: group.members.len(),
            });

            let request = MergeRequest {
                title: Some(tag.clone()),
                session_id: None,
                target_dir: Some(self.merged_dir.clone()),
                delete_sources,
                dry_run,
            };
            let result = pipeline.run_resolved(group.members.clone(), &request, |event| {
                on_progress(SplitProgress::Merge {
                    tag: tag.clone(),
                    event,
                })
            });

            match &result {
                Ok(_) => on_progress(SplitProgress::GroupFinished { tag: tag.clone() }),
                Err(err) => {
                    tracing::warn!(tag = %tag, "group merge failed: {}", err);
                    on_progress(SplitProgress::GroupFailed {
                        tag: tag.clone(),
                        reason: err.to_string(),
                    });
                }
            }

            outcomes.push(GroupOutcome {
                tag,
                members: group.members,
                result,
            });
        }

        outcomes
    }
}

/// Ids flagged `isMerged` in the catalogs of the scanned directories
fn merged_outputs(sessions: &[FragmentSummary]) -> HashSet<String> {
    let mut catalogs: HashMap<PathBuf, Option<SessionCatalog>> = HashMap::new();
    let mut merged = HashSet::new();

    for session in sessions {
        let catalog = catalogs
            .entry(session.project_dir.clone())
            .or_insert_with(|| match SessionCatalog::load(&session.project_dir) {
                Ok(catalog) => Some(catalog),
                Err(err) => {
                    tracing::debug!(dir = %session.project_dir.display(), "catalog unavailable: {}", err);
                    None
                }
            });
        let is_merged = catalog
            .as_ref()
            .is_some_and(|c| c.is_merged(session.id.as_str()));
        if is_merged {
            merged.insert(session.id.to_string());
        }
    }

    merged
}
