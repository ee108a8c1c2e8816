use crate::summary::FragmentSummary;
use crate::{Error, Result};
use agstitch_types::{Fragment, FragmentLoad, Record, Timestamp};
use chrono::{DateTime, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::fragment_id_from_path;
use super::sidechain::{sidechain_dir, sidechain_files};

/// Read a whole session file into memory.
///
/// Malformed lines are skipped and reported in `FragmentLoad::warnings`;
/// only failing to read the file at all is an error.
pub fn read_fragment(path: &Path) -> Result<FragmentLoad> {
    let id = fragment_id_from_path(path)?;
    let bytes = fs::read(path)?;
    Ok(Fragment::parse_bytes(
        id,
        &path.display().to_string(),
        &bytes,
    ))
}

/// Collect listing metadata in a single streaming pass over the file
pub fn summarize_fragment(path: &Path) -> Result<FragmentSummary> {
    let id = fragment_id_from_path(path)?;
    let metadata = fs::metadata(path)?;
    let reader = BufReader::new(File::open(path)?);

    let mut record_count = 0;
    let mut message_count = 0;
    let mut malformed_lines = 0;
    let mut first_timestamp: Option<Timestamp> = None;
    let mut last_timestamp: Option<Timestamp> = None;
    let mut group_tag = None;
    let mut preview = None;
    let mut project_root = None;

    for raw in reader.split(b'\n') {
        let raw = raw?;
        let Ok(line) = std::str::from_utf8(&raw) else {
            malformed_lines += 1;
            continue;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record = match Record::from_line(line) {
            Ok(record) => record,
            Err(_) => {
                malformed_lines += 1;
                continue;
            }
        };

        record_count += 1;
        if record.is_message() {
            message_count += 1;
        }
        if let Some(ts) = record.timestamp() {
            if first_timestamp.is_none_or(|cur| ts < cur) {
                first_timestamp = Some(ts);
            }
            if last_timestamp.is_none_or(|cur| ts > cur) {
                last_timestamp = Some(ts);
            }
        }
        if let Some(tag) = record.group_tag() {
            group_tag = Some(tag.to_string());
        }
        if preview.is_none() && !record.is_sidechain() {
            preview = record.user_text().map(str::to_string);
        }
        if project_root.is_none() {
            project_root = record.cwd().map(str::to_string);
        }
    }

    let modified = metadata
        .modified()
        .ok()
        .map(|t| DateTime::<Utc>::from(t).to_rfc3339());

    Ok(FragmentSummary {
        id,
        path: path.to_path_buf(),
        project_dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        project_root,
        size_bytes: metadata.len(),
        modified,
        record_count,
        message_count,
        malformed_lines,
        first_timestamp,
        last_timestamp,
        group_tag,
        preview,
        sidechain_files: sidechain_files(path)?,
    })
}

/// Write records to a new session file.
///
/// Lines go to a temporary sibling first and are renamed into place once
/// fully flushed, so a crash never leaves a truncated file under the final
/// name. An existing file at `path` is never replaced.
pub fn write_fragment(path: &Path, records: &[Record]) -> Result<()> {
    if path.exists() {
        return Err(Error::AlreadyExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_sibling(path)?;
    let written = write_lines(&tmp_path, records);
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    if path.exists() {
        let _ = fs::remove_file(&tmp_path);
        return Err(Error::AlreadyExists(path.to_path_buf()));
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn write_lines(path: &Path, records: &[Record]) -> Result<()> {
    let file = OpenOptions::new().write(true).create_new(true).open(path)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        writer.write_all(record.to_line()?.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn temp_sibling(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::NotAFragment(path.to_path_buf()))?;
    Ok(path.with_file_name(format!(".{}.tmp-{}", name, std::process::id())))
}

/// Delete a session file and its side directory.
///
/// Returns one error per item that could not be removed; the caller decides
/// how loudly to report them.
pub fn remove_fragment(path: &Path) -> Vec<Error> {
    let mut errors = Vec::new();

    if let Err(err) = fs::remove_file(path) {
        errors.push(Error::Io(err));
    }

    let side = sidechain_dir(path);
    if side.is_dir()
        && let Err(err) = fs::remove_dir_all(&side)
    {
        errors.push(Error::Io(err));
    }

    errors
}
