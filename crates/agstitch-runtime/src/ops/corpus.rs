use crate::{Error, Result};
use agstitch_engine::{TrunkAnalysis, analyze_trunk};
use agstitch_providers::{
    FragmentSummary, project_log_dir, read_fragment, scan_corpus, scan_project_dir,
    summarize_fragment,
};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Which part of the corpus a listing covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    /// Sessions recorded in this workspace directory
    Project(PathBuf),
}

/// Detailed view of one session
#[derive(Debug, Clone, Serialize)]
pub struct SessionInspection {
    pub summary: FragmentSummary,
    pub analysis: TrunkAnalysis,
    /// One line per skipped record
    pub warnings: Vec<String>,
}

pub struct CorpusService {
    root: PathBuf,
}

impl CorpusService {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every session in the corpus, in path order
    pub fn scan(&self) -> Result<Vec<FragmentSummary>> {
        Ok(scan_corpus(&self.root)?)
    }

    /// Sessions in scope, most recently active first
    pub fn list(&self, scope: &Scope) -> Result<Vec<FragmentSummary>> {
        let mut sessions = match scope {
            Scope::All => self.scan()?,
            Scope::Project(project_root) => {
                scan_project_dir(&project_log_dir(&self.root, project_root))?
            }
        };
        sessions.sort_by(|a, b| {
            b.last_timestamp
                .cmp(&a.last_timestamp)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(sessions)
    }

    /// Resolve each reference to exactly one session.
    ///
    /// A reference is a session id, a unique id prefix, or a path to a
    /// `.jsonl` file. Unknown, ambiguous and repeated references are input
    /// errors.
    pub fn resolve(&self, references: &[String]) -> Result<Vec<FragmentSummary>> {
        let needs_scan = references.iter().any(|r| !looks_like_path(r));
        let corpus = if needs_scan { self.scan()? } else { Vec::new() };

        let mut resolved = Vec::with_capacity(references.len());
        let mut seen = HashSet::new();
        for reference in references {
            let summary = if looks_like_path(reference) {
                summarize_path(Path::new(reference))?
            } else {
                resolve_one(&corpus, reference)?.clone()
            };

            if !seen.insert(summary.path.clone()) {
                return Err(Error::Input(format!(
                    "Session {} was given more than once",
                    summary.id
                )));
            }
            resolved.push(summary);
        }

        Ok(resolved)
    }

    /// Resolve a single reference
    pub fn find(&self, reference: &str) -> Result<FragmentSummary> {
        let mut found = self.resolve(&[reference.to_string()])?;
        found
            .pop()
            .ok_or_else(|| Error::Input(format!("Session not found: {}", reference)))
    }

    /// Parse a session fully and report its tree shape
    pub fn inspect(&self, reference: &str) -> Result<SessionInspection> {
        let summary = self.find(reference)?;
        let load = read_fragment(&summary.path)?;
        Ok(SessionInspection {
            analysis: analyze_trunk(&load.fragment),
            warnings: load.warnings.iter().map(ToString::to_string).collect(),
            summary,
        })
    }
}

fn looks_like_path(reference: &str) -> bool {
    reference.ends_with(".jsonl") && (reference.contains('/') || reference.contains('\\'))
}

fn summarize_path(path: &Path) -> Result<FragmentSummary> {
    if !path.is_file() {
        return Err(Error::Input(format!(
            "Session file not found: {}",
            path.display()
        )));
    }
    Ok(summarize_fragment(path)?)
}

fn resolve_one<'a>(corpus: &'a [FragmentSummary], reference: &str) -> Result<&'a FragmentSummary> {
    let exact: Vec<&FragmentSummary> = corpus
        .iter()
        .filter(|s| s.id.as_str() == reference)
        .collect();
    let candidates = if exact.is_empty() {
        corpus
            .iter()
            .filter(|s| s.id.as_str().starts_with(reference))
            .collect()
    } else {
        exact
    };

    match candidates.as_slice() {
        [] => Err(Error::Input(format!("Session not found: {}", reference))),
        [only] => Ok(*only),
        many => {
            let listed: Vec<String> = many
                .iter()
                .map(|s| s.path.display().to_string())
                .collect();
            Err(Error::Input(format!(
                "Session reference '{}' is ambiguous ({} matches):\n  {}",
                reference,
                many.len(),
                listed.join("\n  ")
            )))
        }
    }
}
