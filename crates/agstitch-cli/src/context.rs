use crate::args::{Cli, OutputFormat};
use agstitch_core::{discover_project_root, expand_tilde, resolve_workspace_path};
use agstitch_runtime::{Config, CorpusService, Scope};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Resolved global settings shared by every handler
pub struct ExecutionContext {
    config: Config,
    corpus_root: PathBuf,
    project_root: Option<String>,
    pub all_projects: bool,
    pub format: OutputFormat,
}

impl ExecutionContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let data_dir = resolve_workspace_path(cli.data_dir.as_deref())
            .context("Could not determine the data directory")?;
        let config = Config::load(&data_dir)
            .with_context(|| format!("Failed to load config from {}", data_dir.display()))?;

        let corpus_root = match &cli.corpus_root {
            Some(root) => expand_tilde(root),
            None => config.corpus_root()?,
        };
        tracing::debug!(
            data_dir = %data_dir.display(),
            corpus_root = %corpus_root.display(),
            "resolved paths"
        );

        Ok(Self {
            config,
            corpus_root,
            project_root: cli.project_root.clone(),
            all_projects: cli.all_projects,
            format: cli.format,
        })
    }

    pub fn corpus(&self) -> CorpusService {
        CorpusService::new(self.corpus_root.clone())
    }

    /// Listing scope: the current project unless `--all-projects`
    pub fn scope(&self) -> Result<Scope> {
        if self.all_projects {
            return Ok(Scope::All);
        }
        let root = discover_project_root(self.project_root.as_deref())?;
        Ok(Scope::Project(root))
    }

    /// Fixed directory that bulk merges write into
    pub fn merged_dir(&self) -> PathBuf {
        self.corpus_root.join(&self.config.merged_project)
    }

    pub fn preview_chars(&self) -> usize {
        self.config.preview_chars
    }
}
