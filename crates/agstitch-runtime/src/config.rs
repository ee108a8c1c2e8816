use crate::Result;
use agstitch_core::{default_corpus_root, expand_tilde, resolve_workspace_path};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_MERGED_PROJECT: &str = "-agstitch-merged";
pub const DEFAULT_PREVIEW_CHARS: usize = 80;

fn default_merged_project() -> String {
    DEFAULT_MERGED_PROJECT.to_string()
}

fn default_preview_chars() -> usize {
    DEFAULT_PREVIEW_CHARS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root of the session corpus; `~/.claude/projects` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corpus_root: Option<String>,
    /// Directory inside the corpus that bulk merges write into
    #[serde(default = "default_merged_project")]
    pub merged_project: String,
    /// Preview width in listings
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_root: None,
            merged_project: default_merged_project(),
            preview_chars: default_preview_chars(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the data directory
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::load_from(&data_dir.join(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(resolve_workspace_path(None)?.join(CONFIG_FILE))
    }

    /// Corpus root with `~` expanded
    pub fn corpus_root(&self) -> Result<PathBuf> {
        match &self.corpus_root {
            Some(root) => Ok(expand_tilde(root)),
            None => Ok(default_corpus_root()?),
        }
    }

    /// Fixed target directory for bulk merges
    pub fn merged_dir(&self) -> Result<PathBuf> {
        Ok(self.corpus_root()?.join(&self.merged_project))
    }
}
