use agstitch_index::SessionCatalog;
use agstitch_runtime::{
    CorpusService, Error, MergeOutcome, MergePipeline, MergeProgress, MergeRequest, SplitService,
};
use agstitch_testing::SessionBuilder;
use agstitch_testing::assertions::{
    assert_all_session_ids, assert_chain_connected, assert_sorted_by_timestamp, read_jsonl,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const WORKSPACE: &str = "-Users-test_user-agent-sample";

fn refs(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn two_sessions(root: &Path) -> anyhow::Result<(SessionBuilder, SessionBuilder)> {
    let dir = root.join(WORKSPACE);
    let a = SessionBuilder::new("aaaa1111")
        .starting_at("2025-01-01T10:00:00Z")
        .user("start the refactor")
        .assistant("on it")
        .user("continue")
        .title("refactor");
    let b = SessionBuilder::new("bbbb2222")
        .starting_at("2025-01-02T09:00:00Z")
        .user("resume the refactor")
        .assistant("resuming")
        .title("refactor");
    a.write_to(&dir)?;
    b.write_to(&dir)?;
    Ok((a, b))
}

fn merged(outcome: MergeOutcome) -> anyhow::Result<agstitch_runtime::MergeReport> {
    match outcome {
        MergeOutcome::Merged(report) => Ok(report),
        MergeOutcome::Planned(_) => anyhow::bail!("expected a completed merge"),
    }
}

fn all_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walk(root);
    files.sort();
    files
}

fn walk(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                out.extend(walk(&path));
            } else {
                out.push(path);
            }
        }
    }
    out
}

#[test]
fn test_merge_two_sessions_end_to_end() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let (a, b) = two_sessions(temp_dir.path())?;
    let corpus = CorpusService::new(temp_dir.path().to_path_buf());

    let request = MergeRequest {
        title: Some("combined".to_string()),
        session_id: Some("merged-1".to_string()),
        ..MergeRequest::default()
    };
    let mut events = Vec::new();
    let report = merged(MergePipeline::new(&corpus).run(
        &refs(&["bbbb", "aaaa"]),
        &request,
        |e| events.push(e),
    )?)?;

    let target = temp_dir.path().join(WORKSPACE).join("merged-1.jsonl");
    assert_eq!(report.plan.target_path, target);
    let order: Vec<&str> = report.plan.sources.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(order, vec!["aaaa1111", "bbbb2222"]);

    let records = read_jsonl(&target)?;
    // 5 messages + 2 title markers + the appended marker
    assert_eq!(records.len(), 8);
    assert_eq!(report.records_written, 8);
    assert_all_session_ids(&records, "merged-1")?;
    assert_sorted_by_timestamp(&records)?;

    let b_leaf = &b.uuids()[1];
    assert_chain_connected(&records, b_leaf, 4)?;

    // B's root now hangs off A's leaf
    let b_root = records
        .iter()
        .find(|r| r["uuid"] == b.uuids()[0].as_str())
        .ok_or_else(|| anyhow::anyhow!("B root missing"))?;
    assert_eq!(b_root["parentUuid"], a.uuids()[2].as_str());

    let last = records.last().ok_or_else(|| anyhow::anyhow!("empty output"))?;
    assert_eq!(last["type"], "custom-title");
    assert_eq!(last["customTitle"], "combined");
    assert!(records.iter().all(|r| r["customTitle"] == "combined"));

    // Sources untouched without delete
    assert!(temp_dir.path().join(WORKSPACE).join("aaaa1111.jsonl").exists());
    assert!(temp_dir.path().join(WORKSPACE).join("bbbb2222.jsonl").exists());
    assert!(matches!(events.first(), Some(MergeProgress::Planned { sources: 2, .. })));
    Ok(())
}

#[test]
fn test_catalog_records_merged_entry() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    two_sessions(temp_dir.path())?;
    let corpus = CorpusService::new(temp_dir.path().to_path_buf());

    let request = MergeRequest {
        session_id: Some("merged-cat".to_string()),
        ..MergeRequest::default()
    };
    let report = merged(MergePipeline::new(&corpus).run(
        &refs(&["aaaa1111", "bbbb2222"]),
        &request,
        |_| {},
    )?)?;

    let dir = temp_dir.path().join(WORKSPACE);
    assert_eq!(report.catalog, Some(dir.join("sessions-index.json")));
    let catalog = SessionCatalog::load(&dir)?;
    let entry = catalog
        .get("merged-cat")
        .ok_or_else(|| anyhow::anyhow!("no catalog entry"))?;
    assert!(catalog.is_merged("merged-cat"));
    assert_eq!(entry["messageCount"], 5);
    assert_eq!(entry["firstPrompt"], "start the refactor");
    Ok(())
}

#[test]
fn test_dry_run_leaves_filesystem_unchanged() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    two_sessions(temp_dir.path())?;
    let before = all_files(temp_dir.path());
    let corpus = CorpusService::new(temp_dir.path().to_path_buf());

    let request = MergeRequest {
        dry_run: true,
        delete_sources: true,
        ..MergeRequest::default()
    };
    let outcome = MergePipeline::new(&corpus).run(&refs(&["aaaa", "bbbb"]), &request, |_| {})?;

    assert!(matches!(outcome, MergeOutcome::Planned(_)));
    assert_eq!(outcome.plan().sources.len(), 2);
    assert_eq!(all_files(temp_dir.path()), before);
    Ok(())
}

#[test]
fn test_existing_target_is_a_conflict() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    two_sessions(temp_dir.path())?;
    let taken = temp_dir.path().join(WORKSPACE).join("taken.jsonl");
    fs::write(&taken, "keep me\n")?;
    let corpus = CorpusService::new(temp_dir.path().to_path_buf());

    let request = MergeRequest {
        session_id: Some("taken".to_string()),
        ..MergeRequest::default()
    };
    let result = MergePipeline::new(&corpus).run(&refs(&["aaaa", "bbbb"]), &request, |_| {});

    assert!(matches!(result, Err(Error::Conflict(path)) if path == taken));
    assert_eq!(fs::read_to_string(&taken)?, "keep me\n");
    Ok(())
}

#[test]
fn test_single_reference_is_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    two_sessions(temp_dir.path())?;
    let corpus = CorpusService::new(temp_dir.path().to_path_buf());

    let result =
        MergePipeline::new(&corpus).run(&refs(&["aaaa"]), &MergeRequest::default(), |_| {});
    assert!(matches!(result, Err(Error::Input(_))));
    Ok(())
}

#[test]
fn test_delete_sources_after_write() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().join(WORKSPACE);
    SessionBuilder::new("aaaa1111")
        .user("one")
        .side_file("agent-1.jsonl", "{}\n")
        .write_to(&dir)?;
    SessionBuilder::new("bbbb2222")
        .starting_at("2025-01-03T00:00:00Z")
        .user("two")
        .write_to(&dir)?;
    let corpus = CorpusService::new(temp_dir.path().to_path_buf());

    let request = MergeRequest {
        session_id: Some("joined".to_string()),
        delete_sources: true,
        ..MergeRequest::default()
    };
    let report = merged(MergePipeline::new(&corpus).run(&refs(&["aaaa", "bbbb"]), &request, |_| {})?)?;

    assert_eq!(report.deleted.len(), 2);
    assert!(report.warnings.is_empty());
    assert!(!dir.join("aaaa1111.jsonl").exists());
    assert!(!dir.join("aaaa1111").exists());
    assert!(!dir.join("bbbb2222.jsonl").exists());
    assert!(dir.join("joined.jsonl").exists());
    assert!(dir.join("joined").join("subagents").join("agent-1.jsonl").exists());
    Ok(())
}

#[test]
fn test_failed_deletion_is_a_warning() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().join(WORKSPACE);
    SessionBuilder::new("aaaa1111").user("one").write_to(&dir)?;
    SessionBuilder::new("bbbb2222")
        .starting_at("2025-01-03T00:00:00Z")
        .user("two")
        .write_to(&dir)?;
    let corpus = CorpusService::new(temp_dir.path().to_path_buf());
    let stuck = dir.join("bbbb2222.jsonl");

    let request = MergeRequest {
        session_id: Some("joined".to_string()),
        delete_sources: true,
        ..MergeRequest::default()
    };
    let mut failures = Vec::new();
    let outcome = MergePipeline::new(&corpus).run(&refs(&["aaaa", "bbbb"]), &request, |event| {
        // Once the output is on disk, swap a source for a directory so
        // removing it as a file fails
        if let MergeProgress::Written { .. } = event {
            let _ = fs::remove_file(&stuck);
            let _ = fs::create_dir(&stuck);
        }
        if let MergeProgress::DeleteFailed { path, .. } = &event {
            failures.push(path.clone());
        }
    })?;
    let report = merged(outcome)?;

    assert!(dir.join("joined.jsonl").exists());
    assert_eq!(read_jsonl(&dir.join("joined.jsonl"))?.len(), 2);
    assert_eq!(report.deleted, vec![dir.join("aaaa1111.jsonl")]);
    assert!(!dir.join("aaaa1111.jsonl").exists());
    assert_eq!(failures, vec![stuck.clone()]);

    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].starts_with("failed to delete"));
    assert!(report.warnings[0].contains("bbbb2222.jsonl"));
    Ok(())
}

#[test]
fn test_sidechain_collisions_are_renamed() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().join(WORKSPACE);
    SessionBuilder::new("aaaa1111")
        .user("one")
        .side_file("agent-x.jsonl", "a\n")
        .write_to(&dir)?;
    SessionBuilder::new("bbbb2222")
        .starting_at("2025-01-03T00:00:00Z")
        .user("two")
        .side_file("agent-x.jsonl", "b\n")
        .write_to(&dir)?;
    let corpus = CorpusService::new(temp_dir.path().to_path_buf());

    let request = MergeRequest {
        session_id: Some("joined".to_string()),
        ..MergeRequest::default()
    };
    let report = merged(MergePipeline::new(&corpus).run(&refs(&["aaaa", "bbbb"]), &request, |_| {})?)?;

    let side = dir.join("joined").join("subagents");
    assert_eq!(report.sidechains.len(), 2);
    assert_eq!(fs::read_to_string(side.join("agent-x.jsonl"))?, "a\n");
    assert_eq!(fs::read_to_string(side.join("agent-x-bbbb2222.jsonl"))?, "b\n");
    Ok(())
}

#[test]
fn test_split_detection_groups_shared_titles() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().join(WORKSPACE);
    let other = temp_dir.path().join("-Users-test_user-other");
    SessionBuilder::new("s1").starting_at("2025-01-01T00:00:00Z").user("a").title("auth").write_to(&dir)?;
    SessionBuilder::new("s2").starting_at("2025-01-02T00:00:00Z").user("b").title("auth").write_to(&other)?;
    SessionBuilder::new("s3").starting_at("2025-01-03T00:00:00Z").user("c").title("auth").write_to(&dir)?;
    SessionBuilder::new("s4").user("d").title("solo").write_to(&dir)?;
    SessionBuilder::new("s5").user("e").write_to(&dir)?;
    let corpus = CorpusService::new(temp_dir.path().to_path_buf());

    let split = SplitService::new(&corpus, temp_dir.path().join("-agstitch-merged"));
    let groups = split.detect()?;

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].tag, "auth");
    let ids: Vec<&str> = groups[0].members.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s2", "s3"]);
    Ok(())
}

#[test]
fn test_bulk_merge_isolates_failing_group() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().join(WORKSPACE);
    SessionBuilder::new("g1a").starting_at("2025-01-01T00:00:00Z").user("a").title("one").write_to(&dir)?;
    SessionBuilder::new("g1b").starting_at("2025-01-02T00:00:00Z").user("b").title("one").write_to(&dir)?;
    SessionBuilder::new("g2a").starting_at("2025-01-01T00:00:00Z").user("c").title("two").write_to(&dir)?;
    SessionBuilder::new("g2b").starting_at("2025-01-02T00:00:00Z").user("d").title("two").write_to(&dir)?;
    let corpus = CorpusService::new(temp_dir.path().to_path_buf());
    let merged_dir = temp_dir.path().join("-agstitch-merged");
    let split = SplitService::new(&corpus, merged_dir.clone());

    let groups = split.detect()?;
    assert_eq!(groups.len(), 2);

    // A member of the first group disappears between detection and merge
    fs::remove_file(dir.join("g1b.jsonl"))?;

    let outcomes = split.merge_groups(groups, false, false, |_| {});
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].tag, "one");
    assert!(outcomes[0].result.is_err());
    assert_eq!(outcomes[1].tag, "two");
    let report = match &outcomes[1].result {
        Ok(MergeOutcome::Merged(report)) => report,
        other => anyhow::bail!("group two should merge, got {:?}", other),
    };
    assert!(report.plan.target_path.starts_with(&merged_dir));

    let records = read_jsonl(&report.plan.target_path)?;
    assert!(records.iter().all(|r| r["customTitle"] == "two"));
    Ok(())
}

#[test]
fn test_merged_outputs_are_not_detected_again() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().join(WORKSPACE);
    SessionBuilder::new("x1").starting_at("2025-01-01T00:00:00Z").user("a").title("same").write_to(&dir)?;
    SessionBuilder::new("x2").starting_at("2025-01-02T00:00:00Z").user("b").title("same").write_to(&dir)?;
    let corpus = CorpusService::new(temp_dir.path().to_path_buf());
    let split = SplitService::new(&corpus, temp_dir.path().join("-agstitch-merged"));

    let first = split.merge_all(false, false, |_| {})?;
    assert_eq!(first.len(), 1);
    assert!(first[0].result.is_ok());

    // Sources were kept; the merged file carries the same title but is
    // flagged in its catalog, so the group is still just the two sources
    let groups = split.detect()?;
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].members.len(), 2);
    Ok(())
}
