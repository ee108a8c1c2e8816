//! TestWorld pattern for declarative integration test setup.
//!
//! Provides a fluent interface for:
//! - Creating an isolated corpus and data directory
//! - Placing sessions under Claude-encoded workspace directories
//! - Executing the CLI against that environment

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::fixtures::SessionBuilder;

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use agstitch_testing::{SessionBuilder, TestWorld};
///
/// let world = TestWorld::new()
///     .with_session("/work/app", SessionBuilder::new("s1").user("hi"))
///     .enter_dir("work/app");
///
/// let result = world.run(&["session", "list"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    cwd: PathBuf,
    data_dir: PathBuf,
    corpus_root: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_path = temp_dir.path().to_path_buf();
        let data_dir = base_path.join(".agstitch");
        let corpus_root = base_path.join(".claude").join("projects");

        std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");
        std::fs::create_dir_all(&corpus_root).expect("Failed to create corpus dir");

        Self {
            cwd: base_path.clone(),
            temp_dir,
            data_dir,
            corpus_root,
            env_vars: HashMap::new(),
        }
    }

    /// Get the data directory path (.agstitch).
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the corpus root (.claude/projects).
    pub fn corpus_root(&self) -> &Path {
        &self.corpus_root
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the temp directory root.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Change the current working directory (relative to temp root).
    pub fn enter_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.set_cwd(path);
        self
    }

    /// Set the current working directory without consuming self.
    pub fn set_cwd<P: AsRef<Path>>(&mut self, path: P) {
        let new_cwd = if path.as_ref().is_absolute() {
            path.as_ref().to_path_buf()
        } else {
            self.temp_dir.path().join(path)
        };

        std::fs::create_dir_all(&new_cwd).expect("Failed to create directory");
        self.cwd = new_cwd;
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Workspace log directory for a project path
    pub fn project_dir(&self, project_root: &str) -> PathBuf {
        self.corpus_root
            .join(agstitch_core::encode_project_dir(Path::new(project_root)))
    }

    /// Place a session in the workspace directory of `project_root`.
    pub fn with_session(self, project_root: &str, session: SessionBuilder) -> Self {
        self.add_session(project_root, &session)
            .expect("Failed to write session");
        self
    }

    /// Place a session without consuming self; returns the file path.
    pub fn add_session(&self, project_root: &str, session: &SessionBuilder) -> Result<PathBuf> {
        session.write_to(&self.project_dir(project_root))
    }

    /// Path a session id would have in a project's workspace directory
    pub fn session_path(&self, project_root: &str, session_id: &str) -> PathBuf {
        self.project_dir(project_root)
            .join(format!("{}.jsonl", session_id))
    }

    /// Every `.jsonl` file below the corpus root, sorted
    pub fn jsonl_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(&self.corpus_root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "jsonl"))
            .collect();
        files.sort();
        files
    }

    /// Configure a CLI command with this test environment's settings.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--data-dir")
            .arg(self.data_dir())
            .arg("--corpus-root")
            .arg(self.corpus_root());

        cmd.current_dir(&self.cwd);
        cmd.env_remove("AGSTITCH_PROJECT_ROOT");
        cmd.env_remove("RUST_LOG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute the `agstitch` binary with plain output.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("agstitch")
            .map_err(|e| anyhow::anyhow!("Failed to find agstitch binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Execute with `--format json`.
    pub fn run_json(&self, args: &[&str]) -> Result<CliResult> {
        let mut full = vec!["--format", "json"];
        full.extend_from_slice(args);
        self.run(&full)
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    /// Check if the command succeeded.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Exit code, if the process exited normally.
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    /// Get stdout as a string.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Get stderr as a string.
    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
