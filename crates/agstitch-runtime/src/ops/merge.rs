use crate::ops::corpus::CorpusService;
use crate::{Error, Result};
use agstitch_engine::{MergeOptions, Splice, StitchOutput, stitch};
use agstitch_index::{CatalogEntry, SessionCatalog};
use agstitch_providers::{
    FragmentSummary, SidechainCopy, copy_sidechains, read_fragment, remove_fragment,
    write_fragment,
};
use agstitch_types::{Fragment, FragmentId, Record, Timestamp};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// What to do with a set of sources
#[derive(Debug, Clone, Default)]
pub struct MergeRequest {
    /// New `customTitle` for the merged session
    pub title: Option<String>,
    /// Session id to use instead of a fresh UUID
    pub session_id: Option<String>,
    /// Directory for the merged file; defaults to the first source's
    pub target_dir: Option<PathBuf>,
    pub delete_sources: bool,
    pub dry_run: bool,
}

/// A source as the plan sees it (metadata only)
#[derive(Debug, Clone, Serialize)]
pub struct PlannedSource {
    pub id: FragmentId,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub first_timestamp: Option<Timestamp>,
    pub record_count: usize,
    pub sidechain_files: usize,
}

impl From<&FragmentSummary> for PlannedSource {
    fn from(summary: &FragmentSummary) -> Self {
        Self {
            id: summary.id.clone(),
            path: summary.path.clone(),
            size_bytes: summary.size_bytes,
            first_timestamp: summary.first_timestamp,
            record_count: summary.record_count,
            sidechain_files: summary.sidechain_files.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MergePlan {
    /// Sources in merge (chronological) order
    pub sources: Vec<PlannedSource>,
    pub target_id: String,
    pub target_path: PathBuf,
    pub title: Option<String>,
    pub delete_sources: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    pub plan: MergePlan,
    pub records_written: usize,
    pub message_count: usize,
    pub splices: Vec<Splice>,
    /// Sources that had no usable trunk and were not linked
    pub unlinked: Vec<FragmentId>,
    pub sidechains: Vec<SidechainCopy>,
    /// Catalog that received the new entry, if it could be updated
    pub catalog: Option<PathBuf>,
    pub deleted: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MergeOutcome {
    /// Dry run: nothing was read beyond metadata, nothing written
    Planned(MergePlan),
    Merged(MergeReport),
}

impl MergeOutcome {
    pub fn plan(&self) -> &MergePlan {
        match self {
            MergeOutcome::Planned(plan) => plan,
            MergeOutcome::Merged(report) => &report.plan,
        }
    }
}

#[derive(Debug, Clone)]
pub enum MergeProgress {
    Planned {
        sources: usize,
        target: PathBuf,
    },
    SourceLoaded {
        id: FragmentId,
        records: usize,
    },
    RecordSkipped {
        warning: String,
    },
    Stitched {
        records: usize,
        splices: usize,
    },
    Written {
        path: PathBuf,
        records: usize,
    },
    SidechainCopied {
        copy: SidechainCopy,
    },
    CatalogUpdated {
        path: PathBuf,
    },
    CatalogSkipped {
        reason: String,
    },
    SourceDeleted {
        path: PathBuf,
    },
    DeleteFailed {
        path: PathBuf,
        reason: String,
    },
}

impl MergeProgress {
    /// Events the user should see as warnings
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            MergeProgress::RecordSkipped { .. }
                | MergeProgress::CatalogSkipped { .. }
                | MergeProgress::DeleteFailed { .. }
        )
    }
}

/// Proof that the merged session is completely on disk.
///
/// Only the write stage can build one, and deleting sources requires it.
#[derive(Debug)]
pub struct WrittenFragment {
    path: PathBuf,
    records: usize,
}

impl WrittenFragment {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> usize {
        self.records
    }
}

/// Resolve → Plan → Load → Compute → Write → Sidechains → Catalog → Delete
pub struct MergePipeline<'a> {
    corpus: &'a CorpusService,
}

impl<'a> MergePipeline<'a> {
    pub fn new(corpus: &'a CorpusService) -> Self {
        Self { corpus }
    }

    /// Merge the sessions named by `references` (ids, prefixes or paths)
    pub fn run<F>(&self, references: &[String], request: &MergeRequest, on_progress: F) -> Result<MergeOutcome>
    where
        F: FnMut(MergeProgress),
    {
        if references.len() < 2 {
            return Err(too_few(references.len()));
        }
        let sources = self.corpus.resolve(references)?;
        self.run_resolved(sources, request, on_progress)
    }

    /// Merge already-resolved sources
    pub fn run_resolved<F>(
        &self,
        sources: Vec<FragmentSummary>,
        request: &MergeRequest,
        mut on_progress: F,
    ) -> Result<MergeOutcome>
    where
        F: FnMut(MergeProgress),
    {
        let plan = plan(sources, request)?;
        on_progress(MergeProgress::Planned {
            sources: plan.sources.len(),
            target: plan.target_path.clone(),
        });
        if request.dry_run {
            return Ok(MergeOutcome::Planned(plan));
        }

        let mut warnings = Vec::new();
        let fragments = load(&plan, &mut warnings, &mut on_progress)?;

        let output = stitch(
            fragments,
            &MergeOptions {
                session_id: plan.target_id.clone(),
                title: plan.title.clone(),
                now: Timestamp::now(),
            },
        );
        on_progress(MergeProgress::Stitched {
            records: output.records.len(),
            splices: output.splices.len(),
        });

        let written = write(&plan, &output)?;
        tracing::info!(path = %written.path.display(), records = written.records, "wrote merged session");
        on_progress(MergeProgress::Written {
            path: written.path.clone(),
            records: written.records,
        });

        let sources: Vec<(FragmentId, PathBuf)> = plan
            .sources
            .iter()
            .map(|s| (s.id.clone(), s.path.clone()))
            .collect();
        let sidechains = copy_sidechains(&sources, &written.path)?;
        for copy in &sidechains {
            on_progress(MergeProgress::SidechainCopied { copy: copy.clone() });
        }

        let catalog = match update_catalog(&written, &plan, &output.records) {
            Ok(path) => {
                on_progress(MergeProgress::CatalogUpdated { path: path.clone() });
                Some(path)
            }
            Err(err) => {
                let reason = format!("session catalog not updated: {}", err);
                warnings.push(reason.clone());
                on_progress(MergeProgress::CatalogSkipped { reason });
                None
            }
        };

        let deleted = if plan.delete_sources {
            delete_sources(&written, &plan, &mut warnings, &mut on_progress)
        } else {
            Vec::new()
        };

        let unlinked = output
            .trunks
            .iter()
            .filter(|(_, trunk)| trunk.is_none())
            .map(|(id, _)| id.clone())
            .collect();

        Ok(MergeOutcome::Merged(MergeReport {
            records_written: written.records,
            message_count: output.records.iter().filter(|r| r.is_message()).count(),
            splices: output.splices,
            unlinked,
            sidechains,
            catalog,
            deleted,
            warnings,
            plan,
        }))
    }
}

fn too_few(count: usize) -> Error {
    Error::Input(format!(
        "At least two sessions are required to merge (got {})",
        count
    ))
}

// Plan: order sources, pick the target, refuse anything that would clobber
fn plan(mut sources: Vec<FragmentSummary>, request: &MergeRequest) -> Result<MergePlan> {
    if sources.len() < 2 {
        return Err(too_few(sources.len()));
    }

    let mut seen = HashSet::new();
    for source in &sources {
        if !seen.insert(source.id.clone()) {
            return Err(Error::Input(format!(
                "Session id {} appears more than once among the sources",
                source.id
            )));
        }
    }

    sources.sort_by_key(FragmentSummary::sort_key);

    let target_id = match &request.session_id {
        Some(id) => validate_session_id(id)?,
        None => uuid::Uuid::new_v4().to_string(),
    };
    let target_dir = match &request.target_dir {
        Some(dir) => dir.clone(),
        None => sources[0].project_dir.clone(),
    };
    let target_path = target_dir.join(format!("{}.jsonl", target_id));
    if target_path.exists() {
        return Err(Error::Conflict(target_path));
    }

    Ok(MergePlan {
        sources: sources.iter().map(PlannedSource::from).collect(),
        target_id,
        target_path,
        title: request.title.clone(),
        delete_sources: request.delete_sources,
    })
}

fn validate_session_id(id: &str) -> Result<String> {
    let id = id.trim();
    let valid = !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\'])
        && !id.ends_with(".jsonl");
    if valid {
        Ok(id.to_string())
    } else {
        Err(Error::Input(format!("Invalid session id: '{}'", id)))
    }
}

fn load<F>(plan: &MergePlan, warnings: &mut Vec<String>, on_progress: &mut F) -> Result<Vec<Fragment>>
where
    F: FnMut(MergeProgress),
{
    let mut fragments = Vec::with_capacity(plan.sources.len());
    for source in &plan.sources {
        let load = read_fragment(&source.path)?;
        for warning in &load.warnings {
            warnings.push(warning.to_string());
            on_progress(MergeProgress::RecordSkipped {
                warning: warning.to_string(),
            });
        }
        on_progress(MergeProgress::SourceLoaded {
            id: source.id.clone(),
            records: load.fragment.len(),
        });
        fragments.push(load.fragment);
    }
    Ok(fragments)
}

fn write(plan: &MergePlan, output: &StitchOutput) -> Result<WrittenFragment> {
    write_fragment(&plan.target_path, &output.records)?;
    Ok(WrittenFragment {
        path: plan.target_path.clone(),
        records: output.records.len(),
    })
}

/// Record the merged session in its directory's `sessions-index.json`
fn update_catalog(written: &WrittenFragment, plan: &MergePlan, records: &[Record]) -> Result<PathBuf> {
    let dir = written
        .path
        .parent()
        .ok_or_else(|| Error::Config(format!("No parent directory for {}", written.path.display())))?;
    let mut catalog = SessionCatalog::load(dir)?;

    let full_path = written
        .path
        .canonicalize()
        .unwrap_or_else(|_| written.path.clone());
    let file_mtime = std::fs::metadata(&written.path)?
        .modified()
        .map(|t| DateTime::<Utc>::from(t).timestamp_millis())
        .unwrap_or_default();
    let first = records.iter().filter_map(Record::timestamp).min();
    let last = records
        .iter()
        .filter(|r| r.id().is_some())
        .filter_map(Record::timestamp)
        .max();

    catalog.upsert(CatalogEntry {
        session_id: plan.target_id.clone(),
        full_path: full_path.display().to_string(),
        file_mtime,
        first_prompt: records.iter().find_map(Record::user_text).map(str::to_string),
        message_count: records.iter().filter(|r| r.is_message()).count(),
        created: first.map(|t| t.to_rfc3339()),
        modified: last.map(|t| t.to_rfc3339()),
        project_path: records.iter().find_map(Record::cwd).map(str::to_string),
        is_sidechain: false,
        is_merged: true,
        extra: Default::default(),
    })?;
    catalog.save()?;
    Ok(catalog.path().to_path_buf())
}

// Deletion takes the write proof; there is no other way to reach it
fn delete_sources<F>(
    _written: &WrittenFragment,
    plan: &MergePlan,
    warnings: &mut Vec<String>,
    on_progress: &mut F,
) -> Vec<PathBuf>
where
    F: FnMut(MergeProgress),
{
    let mut deleted = Vec::new();
    for source in &plan.sources {
        let errors = remove_fragment(&source.path);
        if errors.is_empty() {
            drop_catalog_entry(&source.path, &source.id, warnings);
            on_progress(MergeProgress::SourceDeleted {
                path: source.path.clone(),
            });
            deleted.push(source.path.clone());
            continue;
        }

        for err in errors {
            let reason = err.to_string();
            tracing::warn!(path = %source.path.display(), "failed to delete source: {}", reason);
            warnings.push(format!("failed to delete {}: {}", source.path.display(), reason));
            on_progress(MergeProgress::DeleteFailed {
                path: source.path.clone(),
                reason,
            });
        }
    }
    deleted
}

fn drop_catalog_entry(path: &Path, id: &FragmentId, warnings: &mut Vec<String>) {
    let Some(dir) = path.parent() else {
        return;
    };
    let result = SessionCatalog::load(dir).and_then(|mut catalog| {
        if catalog.remove(id.as_str()) {
            catalog.save()?;
        }
        Ok(())
    });
    if let Err(err) = result {
        warnings.push(format!("catalog entry for {} not removed: {}", id, err));
    }
}
