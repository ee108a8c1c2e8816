use crate::Result;
use agstitch_types::FragmentId;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const SUBAGENTS_DIR: &str = "subagents";

/// Side directory of a session file: `<dir>/<stem>`
pub fn sidechain_dir(path: &Path) -> PathBuf {
    match path.file_stem() {
        Some(stem) => path.with_file_name(stem),
        None => path.to_path_buf(),
    }
}

/// Regular files under `<stem>/subagents/`, sorted by name.
///
/// A missing side directory is not an error.
pub fn sidechain_files(path: &Path) -> Result<Vec<PathBuf>> {
    let dir = sidechain_dir(path).join(SUBAGENTS_DIR);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// One copied side file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidechainCopy {
    pub from: PathBuf,
    pub to: PathBuf,
    /// True when the name collided and a source-id suffix was added
    pub renamed: bool,
}

/// Copy every source's side files into `<target>/<stem>/subagents/` of the
/// new session file at `target`.
///
/// Sources are processed in the order given. A name already taken by an
/// earlier copy (or by a file already present) becomes
/// `<stem>-<short source id>.<ext>`; if that is taken too a counter is added.
pub fn copy_sidechains(
    sources: &[(FragmentId, PathBuf)],
    target: &Path,
) -> Result<Vec<SidechainCopy>> {
    let dest_dir = sidechain_dir(target).join(SUBAGENTS_DIR);
    let mut taken: HashSet<PathBuf> = HashSet::new();
    let mut copies = Vec::new();

    for (source_id, source_path) in sources {
        let files = sidechain_files(source_path)?;
        if files.is_empty() {
            continue;
        }
        fs::create_dir_all(&dest_dir)?;

        for from in files {
            let Some(name) = from.file_name() else {
                continue;
            };
            let plain = dest_dir.join(name);
            let (to, renamed) = if taken.contains(&plain) || plain.exists() {
                (free_name(&dest_dir, &from, source_id, &taken), true)
            } else {
                (plain, false)
            };

            fs::copy(&from, &to)?;
            tracing::debug!(from = %from.display(), to = %to.display(), "copied side file");
            taken.insert(to.clone());
            copies.push(SidechainCopy { from, to, renamed });
        }
    }

    Ok(copies)
}

fn free_name(dir: &Path, from: &Path, source_id: &FragmentId, taken: &HashSet<PathBuf>) -> PathBuf {
    let stem = from
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = from
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut candidate = dir.join(format!("{}-{}{}", stem, source_id.short(), ext));
    let mut n = 2;
    while taken.contains(&candidate) || candidate.exists() {
        candidate = dir.join(format!("{}-{}-{}{}", stem, source_id.short(), n, ext));
        n += 1;
    }
    candidate
}
